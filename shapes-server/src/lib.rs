//! Static asset server for the browser viewer.
//!
//! A handful of fixed routes point at the generated wasm bundle and the
//! vendored widget scripts; everything else is looked up in the client
//! directory. Missing files answer 404.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub const DEFAULT_PORT: u16 = 3000;

/// Where each group of served files lives on disk
#[derive(Debug, Clone)]
pub struct AssetConfig {
    pub client_dir: PathBuf,
    pub pkg_dir: PathBuf,
    pub vendor_dir: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            client_dir: PathBuf::from("client"),
            pkg_dir: PathBuf::from("shapes-web/pkg"),
            vendor_dir: PathBuf::from("vendor"),
        }
    }
}

impl AssetConfig {
    /// Fixed request path to file mappings
    pub fn vendored_routes(&self) -> [(&'static str, PathBuf); 4] {
        [
            ("/pkg/shapes_web.js", self.pkg_dir.join("shapes_web.js")),
            ("/pkg/shapes_web_bg.wasm", self.pkg_dir.join("shapes_web_bg.wasm")),
            ("/jsm/libs/stats.module", self.vendor_dir.join("stats.module.js")),
            ("/jsm/libs/dat.gui.module", self.vendor_dir.join("dat.gui.module.js")),
        ]
    }
}

pub fn app(config: &AssetConfig) -> Router {
    let router = config
        .vendored_routes()
        .into_iter()
        .fold(Router::new(), |router, (route, file)| {
            router.route_service(route, ServeFile::new(file))
        });

    router
        .fallback_service(ServeDir::new(&config.client_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
}

/// Port from a raw `PORT` value; absent, zero or non-numeric falls back to [`DEFAULT_PORT`]
pub fn parse_port(value: Option<&str>) -> u16 {
    value
        .and_then(|raw| raw.trim().parse::<u16>().ok())
        .filter(|port| *port != 0)
        .unwrap_or(DEFAULT_PORT)
}

pub fn port_from_env() -> u16 {
    parse_port(std::env::var("PORT").ok().as_deref())
}

pub fn listen_addr(host: IpAddr, port: u16) -> SocketAddr {
    SocketAddr::new(host, port)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;

    struct Fixture {
        _root: TempDir,
        config: AssetConfig,
    }

    fn fixture() -> Fixture {
        let root = tempfile::tempdir().expect("tempdir should be created");
        let config = AssetConfig {
            client_dir: root.path().join("client"),
            pkg_dir: root.path().join("pkg"),
            vendor_dir: root.path().join("vendor"),
        };
        for dir in [&config.client_dir, &config.pkg_dir, &config.vendor_dir] {
            fs::create_dir_all(dir).expect("fixture dir should be created");
        }
        fs::write(config.client_dir.join("index.html"), "<canvas id=\"scene\"></canvas>").unwrap();
        fs::write(config.client_dir.join("main.js"), "import init from '/pkg/shapes_web.js';").unwrap();
        fs::write(config.pkg_dir.join("shapes_web.js"), "export default function init() {}").unwrap();
        fs::write(config.pkg_dir.join("shapes_web_bg.wasm"), b"\0asm\x01\0\0\0").unwrap();
        fs::write(config.vendor_dir.join("stats.module.js"), "export default class Stats {}").unwrap();
        fs::write(config.vendor_dir.join("dat.gui.module.js"), "export class GUI {}").unwrap();

        Fixture {
            _root: root,
            config,
        }
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request should build");
        let response = router
            .oneshot(request)
            .await
            .expect("request should complete");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body should be readable")
            .to_bytes();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn vendored_routes_serve_their_files() {
        let fixture = fixture();
        for (route, file) in fixture.config.vendored_routes() {
            let (status, body) = get(app(&fixture.config), route).await;
            assert_eq!(status, StatusCode::OK, "{route}");
            assert!(!body.is_empty(), "{route}");
            assert_eq!(body, fs::read(file).unwrap(), "{route}");
        }
    }

    #[tokio::test]
    async fn client_files_and_index_are_served() {
        let fixture = fixture();
        let (status, body) = get(app(&fixture.config), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<canvas id=\"scene\"></canvas>");

        let (status, body) = get(app(&fixture.config), "/main.js").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with(b"import init"));
    }

    #[tokio::test]
    async fn unmapped_paths_are_not_found() {
        let fixture = fixture();
        for uri in ["/missing.js", "/jsm/libs/three.module", "/pkg/other.wasm"] {
            let (status, _) = get(app(&fixture.config), uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn missing_vendored_file_is_not_found() {
        let fixture = fixture();
        fs::remove_file(fixture.config.vendor_dir.join("dat.gui.module.js")).unwrap();
        let (status, _) = get(app(&fixture.config), "/jsm/libs/dat.gui.module").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn port_defaults_when_absent_or_not_numeric() {
        assert_eq!(parse_port(None), DEFAULT_PORT);
        assert_eq!(parse_port(Some("")), DEFAULT_PORT);
        assert_eq!(parse_port(Some("eighty")), DEFAULT_PORT);
        assert_eq!(parse_port(Some("70000")), DEFAULT_PORT);
        assert_eq!(parse_port(Some("0")), DEFAULT_PORT);
        assert_eq!(parse_port(Some("8080")), 8080);
        assert_eq!(parse_port(Some(" 4000 ")), 4000);
    }

    #[test]
    fn listen_addr_combines_host_and_port() {
        let addr = listen_addr(IpAddr::from([127, 0, 0, 1]), DEFAULT_PORT);
        assert_eq!(addr.to_string(), "127.0.0.1:3000");
    }
}
