//! `handoff` command: external map launch URLs.

use anyhow::bail;
use cookiemap_core::handoff::{
    google_maps_web_url, launch_chain, launch_with_fallback, HandoffTarget, MapApp,
};
use cookiemap_core::Coordinate;

/// Prints the launch chain for a search query or a walking destination.
///
/// A terminal host can only open web links, so the chain is also resolved
/// against a launcher that rejects app and store schemes.
///
/// # Errors
///
/// Returns an error if neither a query nor a destination is given.
pub(crate) fn run_handoff(
    query: Option<&str>,
    to: Option<Coordinate>,
    name: Option<&str>,
    app: MapApp,
) -> anyhow::Result<()> {
    let (target, web_query) = match (query, to) {
        (Some(query), _) => (HandoffTarget::Search { query }, query.to_string()),
        (None, Some(destination)) => {
            let name = name.unwrap_or_default();
            (
                HandoffTarget::Route { destination, name },
                destination.to_string(),
            )
        }
        (None, None) => bail!("either --query or --to is required"),
    };

    let chain = launch_chain(app, target);
    for (step, url) in chain.iter().enumerate() {
        println!("{}. {url}", step + 1);
    }
    println!("web: {}", google_maps_web_url(&web_query));

    match launch_with_fallback(&chain, web_only_launcher) {
        Ok(url) => println!("terminal would open: {url}"),
        Err(errors) => tracing::warn!(?errors, "no launchable url in chain"),
    }
    Ok(())
}

fn web_only_launcher(url: &str) -> Result<(), String> {
    if url.starts_with("https://") {
        Ok(())
    } else {
        Err(format!("no handler for {url}"))
    }
}
