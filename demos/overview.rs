//! Walk a Jenkins server with the blocking client.
//!
//! Run with:
//! ```bash
//! cargo run --example overview
//! # or: cargo run --no-default-features --features ureq,native-tls --example overview
//! ```
//!
//! Environment:
//! - `JENKINS_URL` (e.g. `https://jenkins.example.com`)
//! - `JENKINS_USER`, `JENKINS_TOKEN` (optional, but most instances require auth)
//! - `JENKINS_JOB` (default: `core`)
//! - `JENKINS_TRIGGER=1` to actually launch the job (POST)

use jenkins_rest::{ClientBuilder, JenkinsClient};
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    let job_name = env_or("JENKINS_JOB", "core");
    let trigger = env_bool("JENKINS_TRIGGER");

    let builder = match ClientBuilder::from_env() {
        Ok(builder) => builder,
        Err(_) => JenkinsClient::builder("https://jenkins.example.com")?,
    };
    let client = builder
        .no_system_proxy()
        .timeout(Duration::from_secs(20))
        .with_crumbs()
        .build()?;

    if !client.is_available()? {
        println!("{} is not answering", client.url());
        return Ok(());
    }
    println!("crumbs enabled: {}", client.are_crumbs_enabled());

    let queue = client.get_queue()?;
    println!("queue items: {}", queue.items().len());

    let executors = client.get_built_in_executors()?;
    let busy = executors.iter().filter(|e| !e.is_idle()).count();
    println!("built-in executors: total={}, busy={busy}", executors.len());

    println!("first three jobs:");
    for summary in client.get_all_jobs()?.iter().take(3) {
        println!("  - {} ({})", summary.name, summary.color.as_deref().unwrap_or("-"));
    }

    if let Some(view) = client.get_primary_view()? {
        println!("primary view {} is {}", view.name(), view.color());
    }

    let Some(job) = client.get_job(job_name.as_str())? else {
        println!("job {job_name} does not exist");
        return Ok(());
    };

    if let Some(build) = job.last_build()? {
        println!(
            "last build #{}: {:?}, took {:?}",
            build.number(),
            build.result(),
            build.duration()
        );
        let log = build.console_text()?;
        println!("log tail:\n{}", tail_chars(&log, 200));
    }

    if trigger {
        job.launch([("foo", "1"), ("env", "dev")])?;
        println!("launched {job_name}");
    } else {
        println!("skipping launch (set JENKINS_TRIGGER=1 to enable)");
    }

    Ok(())
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_owned())
}

fn env_bool(name: &str) -> bool {
    matches!(
        std::env::var(name)
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
            .as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

fn tail_chars(s: &str, max_chars: usize) -> &str {
    if max_chars == 0 {
        return "";
    }

    let mut iter = s.char_indices().rev();
    let mut start = None;
    for _ in 0..max_chars {
        match iter.next() {
            Some((idx, _)) => start = Some(idx),
            None => return s,
        }
    }
    &s[start.unwrap_or(0)..]
}
