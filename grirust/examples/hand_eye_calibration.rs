//! Hand-eye calibration walkthrough
//!
//! Runs the full calibration sequence against a configured pipeline:
//! INIT, eight SET_POSE samples, then CALIBRATE. In a real integration
//! each sample is the robot's flange pose while the calibration grid is
//! visible to the camera.

use std::time::Duration;

use grirust::{GriClient, Pose};
use tokio::time::sleep;

const PIPELINE_ID: i32 = 0;

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

    let status = client.get_status().await;
    println!("STATUS: ready={}", status.ready);

    let init = client.hec_init(PIPELINE_ID).await;
    if !init.acknowledged {
        eprintln!("HEC init failed: {:?}", init.error);
        client.disconnect().await;
        return;
    }

    // Eight distinct poses around the calibration grid, per the
    // manufacturer's recommendation
    let calib_poses = [
        Pose::new(100.0, 0.0, 300.0, 0.0, 0.0, 0.0, 1.0),
        Pose::new(150.0, 50.0, 310.0, 0.1, 0.0, 0.0, 0.9949),
        Pose::new(100.0, 100.0, 300.0, 0.0, 0.1, 0.0, 0.9949),
        Pose::new(50.0, 50.0, 290.0, 0.0, 0.0, 0.1, 0.9949),
        Pose::new(120.0, 20.0, 320.0, -0.1, 0.0, 0.0, 0.9949),
        Pose::new(120.0, 80.0, 280.0, 0.0, -0.1, 0.0, 0.9949),
        Pose::new(80.0, 20.0, 310.0, 0.0, 0.0, -0.1, 0.9949),
        Pose::new(80.0, 80.0, 305.0, 0.071, 0.071, 0.071, 0.992),
    ];

    for (index, pose) in calib_poses.iter().enumerate() {
        let slot_id = (index + 1) as i32; // slots are 1-based
        println!("Setting HEC pose for slot {}: {}", slot_id, pose);

        // Placeholder for robot motion and settling
        sleep(Duration::from_millis(500)).await;

        let set = client.hec_set_pose(PIPELINE_ID, slot_id, pose).await;
        if !set.acknowledged {
            eprintln!("HEC set pose for slot {} failed: {:?}", slot_id, set.error);
            client.disconnect().await;
            return;
        }
    }

    let calibrate = client.hec_calibrate(PIPELINE_ID).await;
    if calibrate.acknowledged {
        println!("Calibration command acknowledged. Check server for results.");
        if let Some(response) = &calibrate.response {
            let p = &response.pose;
            if p.x.abs() > 1e-9 || p.y.abs() > 1e-9 || p.z.abs() > 1e-9 {
                println!("Computed hand-eye transform: {}", p);
            }
        }
    } else {
        eprintln!("HEC calibrate failed: {:?}", calibrate.error);
    }

    client.disconnect().await;
}
