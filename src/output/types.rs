use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

pub const SCHEMA_VERSION: &str = "ilrdc.v1";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Meta {
    pub duration_ms: u128,
}

/// Either what a command would do, or what it did.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    Plan(Value),
    Result(Value),
}

/// Single JSON document printed on stdout under `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub schema_version: &'static str,
    pub time: DateTime<Utc>,
    pub request_id: Uuid,
    pub op: &'static str,
    pub apply: bool,
    #[serde(flatten)]
    pub payload: Payload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl Envelope {
    fn new(op: &'static str, payload: Payload, meta: Option<Meta>) -> Self {
        Envelope {
            schema_version: SCHEMA_VERSION,
            time: Utc::now(),
            request_id: Uuid::new_v4(),
            op,
            apply: matches!(payload, Payload::Result(_)),
            payload,
            meta,
        }
    }

    pub fn plan<T: Serialize>(op: &'static str, plan: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::new(op, Payload::Plan(serde_json::to_value(plan)?), None))
    }

    pub fn result<T: Serialize>(op: &'static str, result: &T, meta: Option<Meta>) -> Result<Self, serde_json::Error> {
        Ok(Self::new(op, Payload::Result(serde_json::to_value(result)?), meta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plan_envelope_has_plan_and_no_result() {
        let env = Envelope::plan("download", &json!({"requests": 15})).unwrap();
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["schema_version"], "ilrdc.v1");
        assert_eq!(v["op"], "download");
        assert_eq!(v["apply"], false);
        assert_eq!(v["plan"]["requests"], 15);
        assert!(v.get("result").is_none());
        assert!(v.get("meta").is_none());
    }

    #[test]
    fn result_envelope_keeps_unicode_and_duration() {
        let env = Envelope::result("download", &json!({"dialect": "泰雅語"}), Some(Meta { duration_ms: 12 })).unwrap();
        let s = serde_json::to_string(&env).unwrap();
        assert!(s.contains("\"apply\":true"));
        assert!(s.contains("\"result\":{\"dialect\":\"泰雅語\"}"));
        assert!(s.contains("\"meta\":{\"duration_ms\":12}"));
        assert!(!s.contains("\"plan\""));
    }
}
