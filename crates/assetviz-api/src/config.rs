//! Service configuration.
//!
//! Read from an optional file (`assetviz.toml` by default) and then from
//! `ASSETVIZ__*` environment variables, e.g. `ASSETVIZ__GRAPH__HOST`.
//!
//! Only the `ASSETVIZ__` names are read. Deployments still exporting the
//! older variables need to rename them:
//!
//! | Older variable | Key | Environment variable |
//! |---|---|---|
//! | `NEBULA_HOST` | `graph.host` | `ASSETVIZ__GRAPH__HOST` |
//! | `NEBULA_PORT` | `graph.port` | `ASSETVIZ__GRAPH__PORT` |
//! | `NEBULA_USER` | `graph.user` | `ASSETVIZ__GRAPH__USER` |
//! | `NEBULA_PASS` | `graph.password` | `ASSETVIZ__GRAPH__PASSWORD` |
//! | `NEBULA_SPACE` | `graph.namespace` | `ASSETVIZ__GRAPH__NAMESPACE` |
//! | `APP_PORT` | `server.port` | `ASSETVIZ__SERVER__PORT` (or `--port`) |

use serde::Deserialize;

use assetviz_graph::GraphConfig;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the front-end bundle; `None` disables static serving.
    #[serde(default = "default_static_dir")]
    pub static_dir: Option<String>,
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> Option<String> {
    Some("static".to_string())
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

/// Load configuration from `file_prefix` (any extension the `config` crate
/// recognises) layered under the environment.
pub fn load(file_prefix: &str) -> Result<AppConfig, config::ConfigError> {
    config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("ASSETVIZ")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let cfg = load("/nonexistent/assetviz-config").unwrap();
        assert_eq!(cfg.graph.host, "localhost");
        assert_eq!(cfg.graph.port, 7687);
        assert_eq!(cfg.graph.namespace, "neo4j");
        assert_eq!(cfg.graph.max_connections, 16);
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.static_dir.as_deref(), Some("static"));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assetviz.toml");
        std::fs::write(
            &path,
            r#"
[graph]
host = "graph.internal"
namespace = "esp01"

[server]
port = 9090
"#,
        )
        .unwrap();

        let prefix = dir.path().join("assetviz");
        let cfg = load(prefix.to_str().unwrap()).unwrap();
        assert_eq!(cfg.graph.host, "graph.internal");
        assert_eq!(cfg.graph.namespace, "esp01");
        assert_eq!(cfg.graph.user, "neo4j");
        assert_eq!(cfg.graph.uri(), "bolt://graph.internal:7687");
        assert_eq!(cfg.server.port, 9090);
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("assetviz.toml"),
            "[server]\nport = \"eighty\"\n",
        )
        .unwrap();

        let prefix = dir.path().join("assetviz");
        assert!(load(prefix.to_str().unwrap()).is_err());
    }
}
