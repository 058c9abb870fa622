//! External map application handoff URLs.
//!
//! Builds the ordered launch chain for a map app: the app's own URL scheme,
//! then its store listing, then the store's web page. The host tries each
//! entry until one opens.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::geo::Coordinate;

/// Identifier passed to apps that want to know who launched them.
pub const APP_NAME: &str = "cookiemap";

/// Characters left unescaped in query values (RFC 3986 unreserved).
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapApp {
    NaverMap,
    KakaoMap,
}

impl MapApp {
    #[must_use]
    pub fn package_name(self) -> &'static str {
        match self {
            MapApp::NaverMap => "com.nhn.android.nmap",
            MapApp::KakaoMap => "net.daum.android.map",
        }
    }
}

impl std::str::FromStr for MapApp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "naver" | "nmap" => Ok(MapApp::NaverMap),
            "kakao" | "kakaomap" => Ok(MapApp::KakaoMap),
            other => Err(format!("unknown map app: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum HandoffTarget<'a> {
    /// Free-text place search, e.g. "CU 강남대로점".
    Search { query: &'a str },
    /// Walking directions to a destination.
    Route {
        destination: Coordinate,
        name: &'a str,
    },
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

/// URL that opens `target` directly in `app`.
#[must_use]
pub fn app_url(app: MapApp, target: HandoffTarget<'_>) -> String {
    match (app, target) {
        (MapApp::NaverMap, HandoffTarget::Search { query }) => format!(
            "nmap://search?query={}&appname={APP_NAME}",
            encode(query)
        ),
        (MapApp::NaverMap, HandoffTarget::Route { destination, name }) => format!(
            "nmap://route/walk?dlat={}&dlng={}&dname={}&appname={APP_NAME}",
            destination.latitude,
            destination.longitude,
            encode(name)
        ),
        (MapApp::KakaoMap, HandoffTarget::Search { query }) => {
            format!("kakaomap://search?q={}", encode(query))
        }
        (MapApp::KakaoMap, HandoffTarget::Route { destination, .. }) => format!(
            "kakaomap://route?ep={},{}&by=FOOT",
            destination.latitude, destination.longitude
        ),
    }
}

/// Launch chain for `target` in `app`: app URL, store app listing, store web page.
#[must_use]
pub fn launch_chain(app: MapApp, target: HandoffTarget<'_>) -> Vec<String> {
    let package = app.package_name();
    vec![
        app_url(app, target),
        format!("market://details?id={package}"),
        format!("https://play.google.com/store/apps/details?id={package}"),
    ]
}

/// Google Maps web search URL, usable without any installed app.
#[must_use]
pub fn google_maps_web_url(query: &str) -> String {
    format!(
        "https://www.google.com/maps/search/?api=1&query={}",
        encode(query)
    )
}

/// Tries each URL of `chain` with `launcher` in order.
///
/// Returns the first URL the launcher accepted.
///
/// # Errors
///
/// Returns every launcher error, in chain order, when no URL could be opened.
pub fn launch_with_fallback<'c, F, E>(chain: &'c [String], mut launcher: F) -> Result<&'c str, Vec<E>>
where
    F: FnMut(&str) -> Result<(), E>,
{
    let mut errors = Vec::new();
    for url in chain {
        match launcher(url) {
            Ok(()) => return Ok(url),
            Err(e) => errors.push(e),
        }
    }
    Err(errors)
}
