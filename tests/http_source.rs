use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use nba_clutch::http_cache::ResponseCache;
use nba_clutch::shot_repository::{HttpShotSource, ShotRepository};
use reqwest::blocking::Client;

const GSW_BODY: &str = r#"[{"player_id":"c/curryst01","player_name":"Stephen Curry Overview",
    "is_made":"True","teams":"2024, GSW vs BOS","quarter":"4th","time_remaining":"0:40",
    "shot_type":"3-pointer","shot_distance":"27","game_date":"Dec 28"}]"#;

struct Reply {
    status: &'static str,
    headers: &'static [(&'static str, &'static str)],
    body: &'static str,
}

/// Answers one connection per reply, in order, and returns every request head
/// lowercased once all replies are sent.
fn serve(replies: Vec<Reply>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let base = format!("http://{}", listener.local_addr().expect("local addr"));
    let handle = thread::spawn(move || {
        let mut requests = Vec::new();
        for reply in replies {
            let (mut stream, _) = listener.accept().expect("accept connection");
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
            let mut head = String::new();
            loop {
                let mut line = String::new();
                let n = reader.read_line(&mut line).expect("read request");
                if n == 0 || line == "\r\n" {
                    break;
                }
                head.push_str(&line);
            }
            requests.push(head.to_ascii_lowercase());

            let mut out = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
                reply.status,
                reply.body.len()
            );
            for (name, value) in reply.headers {
                out.push_str(&format!("{name}: {value}\r\n"));
            }
            out.push_str("\r\n");
            out.push_str(reply.body);
            stream.write_all(out.as_bytes()).expect("write response");
        }
        requests
    });
    (base, handle)
}

fn local_client() -> Client {
    Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("client should build")
}

fn temp_cache_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("nba_clutch_{name}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn cached_files(dir: &Path) -> usize {
    fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

#[test]
fn etag_is_revalidated_across_runs() {
    let (base, server) = serve(vec![
        Reply {
            status: "200 OK",
            headers: &[("ETag", "\"v1\""), ("Content-Type", "application/json")],
            body: GSW_BODY,
        },
        Reply {
            status: "304 Not Modified",
            headers: &[("ETag", "\"v1\"")],
            body: "",
        },
    ]);
    let dir = temp_cache_dir("etag");

    let first = HttpShotSource::with_client(
        base.as_str(),
        local_client(),
        ResponseCache::new(Some(dir.clone())),
    );
    let shots = ShotRepository::new(first).load_team_shots("GSW", "2024");
    assert_eq!(shots.len(), 1);
    assert_eq!(cached_files(&dir), 1);

    // A fresh cache over the same directory picks the stored entry up from disk.
    let second = HttpShotSource::with_client(
        base.as_str(),
        local_client(),
        ResponseCache::new(Some(dir.clone())),
    );
    let shots = ShotRepository::new(second).load_team_shots("GSW", "2024");
    assert_eq!(shots.len(), 1);
    assert_eq!(shots[0].player_id, "c/curryst01");
    assert_eq!(shots[0].distance_ft, 27);

    let requests = server.join().expect("server thread");
    assert!(requests[0].starts_with("get /gsw_shots_2024.json "));
    assert!(!requests[0].contains("if-none-match"));
    assert!(requests[1].contains("if-none-match: \"v1\""));
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn last_modified_is_sent_back() {
    let (base, server) = serve(vec![
        Reply {
            status: "200 OK",
            headers: &[("Last-Modified", "Tue, 01 Oct 2024 10:00:00 GMT")],
            body: "[]",
        },
        Reply {
            status: "304 Not Modified",
            headers: &[],
            body: "",
        },
    ]);
    let client = local_client();
    let cache = ResponseCache::new(None);
    let url = format!("{base}/all_teams_shots_2024.json");

    assert_eq!(cache.fetch_json(&client, &url).expect("first fetch"), "[]");
    assert_eq!(cache.fetch_json(&client, &url).expect("revalidated"), "[]");

    let requests = server.join().expect("server thread");
    assert!(!requests[0].contains("if-modified-since"));
    assert!(requests[1].contains("if-modified-since: tue, 01 oct 2024 10:00:00 gmt"));
}

#[test]
fn error_status_is_empty_and_unvalidated_bodies_are_not_kept() {
    let (base, server) = serve(vec![
        Reply {
            status: "404 Not Found",
            headers: &[],
            body: "missing",
        },
        Reply {
            status: "200 OK",
            headers: &[],
            body: "[]",
        },
        Reply {
            status: "200 OK",
            headers: &[],
            body: "[]",
        },
    ]);
    let dir = temp_cache_dir("uncached");
    let source = HttpShotSource::with_client(
        base.as_str(),
        local_client(),
        ResponseCache::new(Some(dir.clone())),
    );
    let repo = ShotRepository::new(source);

    assert!(repo.load_team_shots("BOS", "2024").is_empty());
    assert!(repo.load_team_shots("BOS", "2024").is_empty());
    assert!(repo.load_team_shots("BOS", "2024").is_empty());
    assert_eq!(cached_files(&dir), 0);

    let requests = server.join().expect("server thread");
    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|r| r.starts_with("get /bos_shots_2024.json ")));
    assert!(!requests[2].contains("if-none-match"));
    let _ = fs::remove_dir_all(dir);
}
