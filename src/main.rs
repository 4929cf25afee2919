use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use nba_clutch::comparison::{PlayerComparison, compare_players};
use nba_clutch::config::Config;
use nba_clutch::game_stats::parse_game_lines_json;
use nba_clutch::leaderboard::{
    EfficiencyPoint, Leaderboard, LeaderboardQuery, LeagueBenchmarks, RadarAxis, SortOrder,
    SortStat, radar_profile,
};
use nba_clutch::report::Report;
use nba_clutch::season::{PlayerSeasonSummary, calculate_player_averages};
use nba_clutch::shot_classifier::{
    ClutchBreakdown, DistanceRow, OutcomeFilter, QuarterRow, ShotFilter, ShotStats,
    clutch_breakdown, distance_report, quarter_report,
};
use nba_clutch::shot_repository::{DirShotSource, HttpShotSource, ShotRepository, ShotSource};
use nba_clutch::shot_trends::{GameTrendPoint, shooting_trend};
use nba_clutch::shots::{ShotEvent, ShotType};
use nba_clutch::teams::team_color;

const DEFAULT_TOP: usize = 25;
const TOP_CLUTCH: usize = 5;

const USAGE: &str = "\
usage:
  nba_clutch leaderboard <game_lines.json> [--team T] [--search S] [--sort STAT] [--asc]
                         [--min-matches N] [--top N] [--json]
  nba_clutch players [--season S] [--json]
  nba_clutch shots <player_id> [--season S] [--compare <player_id>]
                   [--made | --missed] [--quarter Q] [--type 2pt|3pt] [--json]";

#[derive(Debug, Default)]
struct Options {
    positional: Vec<String>,
    team: Option<String>,
    search: Option<String>,
    sort: Option<SortStat>,
    ascending: bool,
    min_matches: Option<u32>,
    top: Option<usize>,
    season: Option<String>,
    compare: Option<String>,
    filter: ShotFilter,
    json: bool,
}

impl Options {
    fn parse(args: &[String]) -> Result<Self> {
        let mut opts = Options::default();
        let mut it = args.iter();
        while let Some(arg) = it.next() {
            let mut value = || {
                it.next()
                    .cloned()
                    .ok_or_else(|| anyhow!("{arg} needs a value"))
            };
            match arg.as_str() {
                "--team" => opts.team = Some(value()?.to_ascii_uppercase()),
                "--search" => opts.search = Some(value()?),
                "--sort" => {
                    let raw = value()?;
                    let stat = SortStat::parse(&raw)
                        .ok_or_else(|| anyhow!("unknown sort stat: {raw}"))?;
                    opts.sort = Some(stat);
                }
                "--asc" => opts.ascending = true,
                "--min-matches" => {
                    let n = value()?.parse().context("--min-matches expects a number")?;
                    opts.min_matches = Some(n);
                }
                "--top" => opts.top = Some(value()?.parse().context("--top expects a number")?),
                "--season" => opts.season = Some(value()?),
                "--compare" => opts.compare = Some(value()?),
                "--made" => opts.filter.outcome = OutcomeFilter::Made,
                "--missed" => opts.filter.outcome = OutcomeFilter::Missed,
                "--quarter" => opts.filter.quarter = Some(value()?),
                "--type" => {
                    opts.filter.shot_type = Some(match value()?.as_str() {
                        "2pt" | "2" => ShotType::TwoPointer,
                        "3pt" | "3" => ShotType::ThreePointer,
                        other => ShotType::parse(other),
                    })
                }
                "--json" => opts.json = true,
                flag if flag.starts_with("--") => bail!("unknown option: {flag}"),
                _ => opts.positional.push(arg.clone()),
            }
        }
        Ok(opts)
    }

    fn season<'a>(&'a self, config: &'a Config) -> &'a str {
        self.season.as_deref().unwrap_or(&config.season)
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        eprintln!("{USAGE}");
        return Ok(());
    };
    let opts = Options::parse(rest)?;

    match command.as_str() {
        "leaderboard" => run_leaderboard(&config, &opts),
        "players" => run_players(&config, &opts),
        "shots" => run_shots(&config, &opts),
        "help" | "-h" | "--help" => {
            println!("{USAGE}");
            Ok(())
        }
        other => bail!("unknown command: {other}\n{USAGE}"),
    }
}

fn repository(config: &Config) -> Result<ShotRepository<Box<dyn ShotSource>>> {
    let source: Box<dyn ShotSource> = match config.data_url.as_deref() {
        Some(url) => {
            info!(url, "reading shots over http");
            Box::new(HttpShotSource::new(url, config.http_timeout)?)
        }
        None => {
            info!(dir = %config.data_dir.display(), "reading shots from disk");
            Box::new(DirShotSource::new(config.data_dir.clone()))
        }
    };
    Ok(ShotRepository::new(source))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("serialize report")?;
    println!("{out}");
    Ok(())
}

#[derive(Serialize)]
struct LeaderboardOutput<'a> {
    qualified: usize,
    players: Vec<&'a PlayerSeasonSummary>,
    top_clutch: Vec<&'a PlayerSeasonSummary>,
    teams: Vec<&'a str>,
    benchmarks: LeagueBenchmarks,
    radar: Option<Vec<RadarAxis>>,
    efficiency: Vec<EfficiencyPoint>,
}

fn run_leaderboard(config: &Config, opts: &Options) -> Result<()> {
    let path = opts
        .positional
        .first()
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("leaderboard needs a game lines file\n{USAGE}"))?;
    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let lines = parse_game_lines_json(&raw)?;
    let table = calculate_player_averages(&lines);
    info!(lines = lines.len(), players = table.len(), "season summaries built");

    let board = Leaderboard::new(table.as_slice(), opts.min_matches.unwrap_or(config.min_matches));
    let query = LeaderboardQuery {
        search: opts.search.clone().unwrap_or_default(),
        team: opts.team.clone(),
        sort_by: opts.sort.unwrap_or_default(),
        order: if opts.ascending {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        },
    };
    let mut rows = board.query(&query);
    rows.truncate(opts.top.unwrap_or(DEFAULT_TOP));
    let benchmarks = board.benchmarks();
    let radar = match rows.as_slice() {
        [only] => Some(radar_profile(only, &benchmarks)),
        _ => None,
    };

    let out = LeaderboardOutput {
        qualified: board.len(),
        players: rows,
        top_clutch: board.top_clutch(TOP_CLUTCH),
        teams: board.teams(),
        benchmarks,
        radar,
        efficiency: board.efficiency_points(),
    };
    if opts.json {
        return print_json(&out);
    }

    println!(
        "{} qualified players ({} teams), sorted by {:?}",
        out.qualified,
        out.teams.len(),
        query.sort_by
    );
    println!(
        "{:<4} {:<26} {:<4} {:>3} {:>6} {:>5} {:>5} {:>5} {:>6} {:>7}",
        "#", "Player", "Team", "GP", "MIN", "PTS", "REB", "AST", "FG%", "Clutch"
    );
    for (rank, p) in out.players.iter().enumerate() {
        let a = &p.averages;
        println!(
            "{:<4} {:<26} {:<4} {:>3} {:>6.1} {:>5.1} {:>5.1} {:>5.1} {:>6.1} {:>7.2}",
            rank + 1,
            p.player_name,
            p.team,
            p.matches,
            a.minutes,
            a.points,
            a.rebounds,
            a.assists,
            p.field_goal_pct(),
            a.clutch_score
        );
    }

    println!("\nTop clutch");
    for p in &out.top_clutch {
        println!("  {:<26} {:<4} {:>7.2}", p.player_name, p.team, p.averages.clutch_score);
    }

    let b = &out.benchmarks;
    println!("\nLeague (avg / max)");
    println!("  points        {:>6.1} / {:.1}", b.points.avg, b.points.max);
    println!("  rebounds      {:>6.1} / {:.1}", b.rebounds.avg, b.rebounds.max);
    println!("  assists       {:>6.1} / {:.1}", b.assists.avg, b.assists.max);
    println!("  fg%           {:>6.1} / {:.1}", b.fg_percentage.avg, b.fg_percentage.max);
    println!("  clutch score  {:>6.2} / {:.2}", b.clutch_score.avg, b.clutch_score.max);

    if let Some(radar) = &out.radar {
        println!("\nProfile vs league (0-100)");
        for axis in radar {
            println!("  {:<13} {:>5.1}  league {:>5.1}", axis.stat, axis.player, axis.league);
        }
    }
    Ok(())
}

fn run_players(config: &Config, opts: &Options) -> Result<()> {
    let season = opts.season(config);
    let players = repository(config)?.available_players(season);
    if opts.json {
        return print_json(&players);
    }
    if players.is_empty() {
        println!("no shot data for season {season}");
        return Ok(());
    }
    for p in &players {
        println!("{:<14} {:<28} {}", p.id, p.name, p.team);
    }
    Ok(())
}

#[derive(Serialize)]
struct ShotsOutput {
    player_id: String,
    shots: usize,
    selected: ShotStats,
    breakdown: Report<ClutchBreakdown>,
    distance: Report<Vec<DistanceRow>>,
    quarters: Report<Vec<QuarterRow>>,
    trend: Report<Vec<GameTrendPoint>>,
    comparison: Option<Report<PlayerComparison>>,
}

fn run_shots(config: &Config, opts: &Options) -> Result<()> {
    let player_id = opts
        .positional
        .first()
        .ok_or_else(|| anyhow!("shots needs a player id\n{USAGE}"))?;
    let season = opts.season(config);
    let repo = repository(config)?;
    let shots = repo.load_player_shots(player_id, season);
    let comparison = opts
        .compare
        .as_deref()
        .map(|other| compare_players(&shots, &repo.load_player_shots(other, season)));

    let out = ShotsOutput {
        player_id: player_id.clone(),
        shots: shots.len(),
        selected: ShotStats::from_shots(opts.filter.apply(&shots)),
        breakdown: clutch_breakdown(&shots),
        distance: distance_report(&shots),
        quarters: quarter_report(&shots),
        trend: shooting_trend(&shots),
        comparison,
    };
    if opts.json {
        return print_json(&out);
    }
    print_shots(&out, shots.first())
}

fn print_shots(out: &ShotsOutput, first: Option<&ShotEvent>) -> Result<()> {
    let Some(first) = first else {
        println!("no shot data for {}", out.player_id);
        return Ok(());
    };
    let color = team_color(first.team_code());
    println!(
        "{} ({}, {} on {}) - {} shots",
        first.display_name(),
        first.team_code(),
        color.bg,
        color.text,
        out.shots
    );
    println!("  selected      {}", stats_line(&out.selected));

    if let Some(b) = out.breakdown.ready() {
        println!("\nSituation");
        println!("  overall       {}", stats_line(&b.overall));
        println!("  regular       {}", stats_line(&b.regular));
        println!("  clutch        {}", stats_line(&b.clutch));
        println!("  critical      {}", stats_line(&b.critical));
    }

    match out.distance.ready() {
        Some(rows) => {
            println!("\nBy distance");
            for row in rows {
                println!(
                    "  {:<6} ft     {}  avg {:.1} ft",
                    row.range,
                    stats_line(&row.stats),
                    row.average_distance
                );
            }
        }
        None => println!("\nBy distance: not enough data"),
    }

    if let Some(rows) = out.quarters.ready() {
        println!("\nBy quarter");
        for row in rows {
            println!("  {:<13} {}", row.quarter, stats_line(&row.stats));
        }
    }

    match out.trend.ready() {
        Some(points) => {
            println!("\nTrend");
            for p in points {
                let avg = p
                    .moving_average
                    .map(|v| format!("{v:.1}%"))
                    .unwrap_or_else(|| "-".to_string());
                println!("  {:<13} {}  3g avg {}", p.game_date, stats_line(&p.stats), avg);
            }
        }
        None => println!("\nTrend: not enough games"),
    }

    match &out.comparison {
        Some(Report::Ready(cmp)) => print_comparison(cmp),
        Some(Report::Insufficient) => println!("\nComparison: not enough data"),
        None => {}
    }
    Ok(())
}

fn print_comparison(cmp: &PlayerComparison) {
    let (a, b) = (&cmp.first, &cmp.second);
    println!("\n{} vs {}", a.player_name, b.player_name);
    println!("  overall       {:>6.1}% {:>6.1}%", a.overall.percentage, b.overall.percentage);
    println!(
        "  2-pointers    {:>6.1}% {:>6.1}%",
        a.overall.two_pointers.percentage, b.overall.two_pointers.percentage
    );
    println!(
        "  3-pointers    {:>6.1}% {:>6.1}%",
        a.overall.three_pointers.percentage, b.overall.three_pointers.percentage
    );
    for (za, zb) in a.zones.iter().zip(&b.zones) {
        println!(
            "  {:<13} {:>6.1}% {:>6.1}%",
            za.zone.label(),
            za.stats.percentage,
            zb.stats.percentage
        );
    }
    let [overall, twos, threes] = cmp.percentage_gaps();
    println!("  gap           {overall:+.1} overall, {twos:+.1} 2pt, {threes:+.1} 3pt");
}

fn stats_line(s: &ShotStats) -> String {
    format!(
        "{:>3}/{:<3} {:>5.1}%  (2pt {}/{}, 3pt {}/{})",
        s.made,
        s.total,
        s.percentage,
        s.two_pointers.made,
        s.two_pointers.attempts,
        s.three_pointers.made,
        s.three_pointers.attempts
    )
}
