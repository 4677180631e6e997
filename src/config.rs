//! Runtime configuration for the demonstration HTTP binary, loaded from
//! environment variables the way the teacher's `AuthConfig::from_env`
//! loads auth configuration: sensible defaults, no panics on missing vars.

/// Configuration for the demonstration binary (`src/main.rs`). Not part
/// of the core matching engine/ledger budget — the core takes its
/// collaborators (`Store`, `ComplianceGate`) as constructor arguments and
/// has no configuration surface of its own; this struct only decides
/// *which* collaborators the binary wires up.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// TCP port the demonstration HTTP surface listens on.
    pub port: u16,
    /// When true, the binary wires a no-op compliance gate instead of
    /// [`crate::compliance::DefaultComplianceGate`].
    pub disable_compliance: bool,
}

impl EngineConfig {
    /// `PORT` env var, default `8080`. `DISABLE_COMPLIANCE=true` (or `1`)
    /// bypasses the compliance gate entirely, mirroring the teacher's
    /// `DISABLE_AUTH` flag in `auth.rs::AuthConfig::from_env`.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);
        let disable_compliance = std::env::var("DISABLE_COMPLIANCE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        Self { port, disable_compliance }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { port: 8080, disable_compliance: false }
    }
}
