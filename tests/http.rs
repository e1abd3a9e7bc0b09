use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct Entry {
    id: String,
    date: String,
    workout_group: String,
    exercise: String,
    weight: String,
    reps: Vec<String>,
    weight_change: String,
    reps3_change: String,
}

#[derive(Debug, Deserialize)]
struct GroupSeries {
    workout_group: String,
    personal_records: BTreeMap<String, f64>,
    rows: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct SessionContext {
    id: String,
    selected_group: Option<String>,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_dir() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("workout_tracker_http_{}_{}", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/health")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_workout_tracker"))
        .env("PORT", port.to_string())
        .env("APP_DATA_DIR", unique_data_dir())
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn create_group(client: &Client, base_url: &str, name: &str, exercises: &[&str]) {
    let response = client
        .post(format!("{base_url}/api/groups"))
        .json(&json!({ "name": name, "exercises": exercises }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn http_workouts_are_annotated_and_survive_group_deletion() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = &server.base_url;

    create_group(&client, base, "Chest Day", &["Bench", "Incline Bench"]).await;

    let first: Vec<Entry> = client
        .post(format!("{base}/api/groups/Chest%20Day/session"))
        .json(&json!({
            "date": "2025-03-01",
            "exercises": [{ "exercise": "Bench", "weight": "180", "reps": ["8", "8", "8"] }]
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first[0].weight_change, "N/A");
    assert_eq!(first[0].workout_group, "Chest Day");

    let second: Vec<Entry> = client
        .post(format!("{base}/api/groups/Chest%20Day/session"))
        .json(&json!({
            "date": "2025-03-04",
            "exercises": [{ "exercise": "Bench", "weight": "185", "reps": ["8", "", "10"] }]
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second[0].weight_change, "+5 lbs");
    assert_eq!(second[0].reps3_change, "+2 reps");
    assert_eq!(second[0].reps, vec!["8", "8", "10"]);

    let trend: GroupSeries = client
        .get(format!("{base}/api/groups/Chest%20Day/trend"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(trend.workout_group, "Chest Day");
    assert_eq!(trend.rows.len(), 2);
    assert_eq!(trend.personal_records.get("Bench"), Some(&185.0));

    let csv = client
        .get(format!("{base}/api/groups/Chest%20Day/export.csv"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(csv.starts_with("date,exercise,weight,reps1,reps2,reps3,weight_change,reps3_change\n"));
    assert!(csv.contains("2025-03-04,Bench,185,8,8,10,+5 lbs,+2 reps"));

    let response = client
        .delete(format!("{base}/api/groups/Chest%20Day"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let entries: Vec<Entry> = client
        .get(format!("{base}/api/entries"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let orphaned: Vec<&Entry> = entries
        .iter()
        .filter(|entry| entry.workout_group == "Chest Day")
        .collect();
    assert_eq!(orphaned.len(), 2);
    assert_eq!(orphaned[0].date, "2025-03-04");

    let response = client
        .delete(format!("{base}/api/entries/{}", orphaned[1].id))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let response = client
        .delete(format!("{base}/api/entries/{}", orphaned[1].id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_invalid_groups_are_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = &server.base_url;

    let response = client
        .post(format!("{base}/api/groups"))
        .json(&json!({ "name": "Legs", "exercises": ["  "] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .get(format!("{base}/api/groups/Nowhere/session"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    create_group(&client, base, "Back", &["Rows"]).await;
    let response = client
        .post(format!("{base}/api/groups/Back/session"))
        .json(&json!({
            "date": "2025-03-02",
            "exercises": [{ "exercise": "Squat", "weight": "225", "reps": ["5", "5", "5"] }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_session_drafts_become_a_workout() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = &server.base_url;

    create_group(&client, base, "Arms", &["Hammer Curls", "Tricep Dumbells"]).await;

    let session: SessionContext = client
        .post(format!("{base}/api/sessions"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(session.selected_group.is_none());

    let selected: SessionContext = client
        .put(format!("{base}/api/sessions/{}/selection", session.id))
        .json(&json!({ "group": "Arms" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(selected.selected_group.as_deref(), Some("Arms"));

    let response = client
        .put(format!("{base}/api/sessions/{}/drafts/Hammer%20Curls", session.id))
        .json(&json!({ "weight": "35", "reps": ["10", "10", "9"] }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let recorded: Vec<Entry> = client
        .post(format!("{base}/api/sessions/{}/finish", session.id))
        .json(&json!({ "date": "2025-03-05" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(recorded.len(), 2);
    assert_eq!(recorded[0].exercise, "Hammer Curls");
    assert_eq!(recorded[0].reps3_change, "+1 reps");
    assert_eq!(recorded[1].weight, "");
    assert_eq!(recorded[1].reps, vec!["8", "8", "8"]);
    assert_eq!(recorded[1].reps3_change, "no change");

    let response = client
        .delete(format!("{base}/api/sessions/{}", session.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = client
        .get(format!("{base}/api/sessions/{}", session.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
