//! Generic robot client walkthrough
//!
//! Demonstrates the status query, synchronous and asynchronous job
//! triggers, pose retrieval loops, and job polling against a live GRI
//! server. Set GRI_SERVER to point at the server.

use std::time::Duration;

use grirust::{GriClient, Pose};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let host = std::env::var("GRI_SERVER").unwrap_or_else(|_| "192.168.2.1".to_string());

    let mut client = GriClient::new(host, 7100);
    if !client.connect().await {
        eprintln!("Failed to connect to the server. Check configuration and server status.");
        return;
    }

    let job_id_sync = 0;
    let job_id_async = 1;

    // 1. Overall system status
    let status = client.get_status().await;
    println!("STATUS: ready={} error={:?}", status.ready, status.error);

    // 2. Synchronous vision job
    let sync_pose = Pose::new(500.0, 100.0, 400.0, 0.0, 0.0, 0.0, 1.0);
    let sync = client.trigger_job_sync(job_id_sync, Some(sync_pose)).await;
    if let Some(pose) = &sync.pose {
        println!(
            "TRIGGER_JOB_SYNC: {} (remaining primary={:?}, related={:?})",
            pose, sync.remaining_primary, sync.remaining_related
        );
    } else {
        println!("TRIGGER_JOB_SYNC failed: {:?}", sync.error);
    }

    // 3. Related pose for the synchronous job
    let related = client.get_related_pose(job_id_sync).await;
    if let Some(pose) = &related.pose {
        println!("GET_RELATED_POSE: {}", pose);
    } else if related.exhausted() {
        println!("No related poses for job {}.", job_id_sync);
    }

    // 4. Drain additional primary poses
    for _ in 0..3 {
        let next = client.get_next_pose(job_id_sync).await;
        if next.exhausted() {
            println!("No more primary poses for job {}.", job_id_sync);
            break;
        }
        let Some(pose) = next.pose else {
            break;
        };
        println!(
            "GET_NEXT_POSE: {} (remaining primary={:?})",
            pose, next.remaining_primary
        );
        if next.remaining_primary.unwrap_or(0) <= 0 {
            break;
        }
    }

    // 5. Asynchronous vision job
    let async_pose = Pose::new(550.0, 150.0, 410.0, 0.0, 0.707, 0.0, 0.707);
    let trigger = client.trigger_job_async(job_id_async, Some(async_pose)).await;
    println!("TRIGGER_JOB_ASYNC: acknowledged={}", trigger.acknowledged);

    // 6. One status poll before waiting
    let pre_wait = client.get_job_status(job_id_async).await;
    println!("GET_JOB_STATUS: {}", pre_wait.status_label());

    // 7. Block until the job finishes
    let completed = client
        .wait_for_job(job_id_async, Duration::from_millis(500), Duration::from_secs(10))
        .await;
    println!("wait_for_job: {}", completed);

    // 8. Drain the results it produced
    if completed {
        loop {
            let next = client.get_next_pose(job_id_async).await;
            if next.exhausted() {
                println!("No more primary poses for job {}.", job_id_async);
                break;
            }
            let Some(pose) = next.pose else {
                break;
            };
            println!(
                "Async pose: {} (remaining primary={:?}, related={:?})",
                pose, next.remaining_primary, next.remaining_related
            );
            if next.remaining_related.unwrap_or(0) > 0 {
                let related = client.get_related_pose(job_id_async).await;
                if let Some(pose) = &related.pose {
                    println!("  -> Related pose: {}", pose);
                }
            }
            if next.remaining_primary.unwrap_or(0) <= 0 {
                break;
            }
        }
    }

    client.disconnect().await;
}
