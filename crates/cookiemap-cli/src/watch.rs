//! `watch` command: a full map session against a scripted route.

use std::sync::Arc;
use std::time::Duration;

use cookiemap_core::{AppConfig, Coordinate};
use cookiemap_pipeline::SimulatedPlatform;

use crate::search::{build_pipeline, print_state, status_line};

/// Short walk north-east from `start`, used when no route is given.
fn default_route(start: Coordinate) -> Vec<Coordinate> {
    (0..5)
        .map(|step| {
            let d = 0.001 * f64::from(step);
            start.offset(d, d)
        })
        .collect()
}

/// Drives the pipeline with `route` and prints every published state.
///
/// Ends when the route has been played, or on ctrl-c.
///
/// # Errors
///
/// Returns an error if the pipeline cannot be built.
pub(crate) async fn run_watch(
    config: &AppConfig,
    route: Vec<Coordinate>,
    deny_permission: bool,
    step: Duration,
) -> anyhow::Result<()> {
    let route = if route.is_empty() {
        default_route(config.fallback_coordinate)
    } else {
        route
    };

    let platform = Arc::new(if deny_permission {
        SimulatedPlatform::denied()
    } else {
        SimulatedPlatform::granted(route.first().copied())
    });
    let pipeline = build_pipeline(config, Arc::clone(&platform))?;
    let mut states = pipeline.subscribe();
    let _handle = pipeline.start();

    let mut player = tokio::spawn(Arc::clone(&platform).play_route(route, step));
    let mut last_printed = None;

    loop {
        tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = states.borrow_and_update().clone();
                println!("{}", status_line(&state));
                if !state.is_loading && state.searched_at != last_printed {
                    last_printed = state.searched_at;
                    print_state(&state);
                }
            }
            _ = &mut player => {
                // let the last fix propagate
                tokio::time::sleep(step).await;
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        }
    }

    let state = pipeline.snapshot();
    if !state.is_location_available {
        println!("{}", status_line(&state));
    }
    Ok(())
}
