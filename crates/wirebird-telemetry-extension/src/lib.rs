//! Reference telemetry extension.
//!
//! Counts completed handshakes in its opaque state and reports one line of
//! connection telemetry per connect through the host facade. Doubles as the
//! smoke test for the extension ABI: build this crate as a `cdylib` and
//! point `WIREBIRD_EXTENSION_MODULE` at the artifact.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use wirebird_extension_sdk::{export_extension, Extension, HostFacade, OpaqueState};

/// State this extension owns. The host persists it as an opaque value; only
/// this crate knows the schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TelemetryState {
    /// Completed handshakes observed across the login's lifetime.
    connect_count: u64,
}

pub struct TelemetryExtension {
    facade: Arc<dyn HostFacade>,
    state: Mutex<TelemetryState>,
}

impl TelemetryExtension {
    /// Constructor with the SDK's `ExtensionCtor` signature.
    ///
    /// State the extension cannot decode (a schema from a newer build, or
    /// hand-edited storage) is treated as a fresh start rather than an
    /// error: there is nobody to report the error to.
    pub fn create(state: OpaqueState, facade: Arc<dyn HostFacade>) -> Box<dyn Extension> {
        let state = state
            .and_then(|raw| serde_json::from_str(raw.get()).ok())
            .unwrap_or_default();
        Box::new(Self {
            facade,
            state: Mutex::new(state),
        })
    }
}

impl Extension for TelemetryExtension {
    fn on_connect(&self, version: u32, platform: &str) {
        let snapshot = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            state.connect_count += 1;
            state.clone()
        };

        let report = serde_json::json!({
            "event": "connect",
            "version": version,
            "platform": platform,
            "connects": snapshot.connect_count,
        });
        self.facade.send_raw(report.to_string().as_bytes());

        if let Ok(raw) = serde_json::value::to_raw_value(&snapshot) {
            self.facade.save_state(Some(raw));
        }
    }
}

export_extension!(TelemetryExtension::create);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingFacade {
        sent: Mutex<Vec<Vec<u8>>>,
        saved: Mutex<Vec<OpaqueState>>,
    }

    impl HostFacade for RecordingFacade {
        fn send_raw(&self, payload: &[u8]) {
            self.sent.lock().unwrap().push(payload.to_vec());
        }

        fn save_state(&self, state: OpaqueState) {
            self.saved.lock().unwrap().push(state);
        }
    }

    fn raw(text: &str) -> OpaqueState {
        Some(serde_json::value::RawValue::from_string(text.into()).unwrap())
    }

    #[test]
    fn test_counts_connects_and_reports_each_one() {
        let facade = Arc::new(RecordingFacade::default());
        let extension = TelemetryExtension::create(None, facade.clone());

        extension.on_connect(4, "web");
        extension.on_connect(4, "web");

        let sent = facade.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        let report: serde_json::Value = serde_json::from_slice(&sent[1]).unwrap();
        assert_eq!(report["event"], "connect");
        assert_eq!(report["platform"], "web");
        assert_eq!(report["version"], 4);
        assert_eq!(report["connects"], 2);
    }

    #[test]
    fn test_persists_counter_after_each_connect() {
        let facade = Arc::new(RecordingFacade::default());
        let extension = TelemetryExtension::create(None, facade.clone());

        extension.on_connect(4, "android");

        let saved = facade.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        let state: TelemetryState =
            serde_json::from_str(saved[0].as_ref().unwrap().get()).unwrap();
        assert_eq!(state.connect_count, 1);
    }

    #[test]
    fn test_resumes_counter_from_persisted_state() {
        let facade = Arc::new(RecordingFacade::default());
        let extension = TelemetryExtension::create(raw(r#"{"connect_count":41}"#), facade.clone());

        extension.on_connect(4, "web");

        let saved = facade.saved.lock().unwrap();
        let state: TelemetryState =
            serde_json::from_str(saved[0].as_ref().unwrap().get()).unwrap();
        assert_eq!(state.connect_count, 42);
    }

    #[test]
    fn test_undecodable_state_starts_fresh() {
        let facade = Arc::new(RecordingFacade::default());
        let extension =
            TelemetryExtension::create(raw(r#"{"some_future_field":true}"#), facade.clone());

        extension.on_connect(4, "web");

        let saved = facade.saved.lock().unwrap();
        let state: TelemetryState =
            serde_json::from_str(saved[0].as_ref().unwrap().get()).unwrap();
        assert_eq!(state.connect_count, 1);
    }
}
