//! Communication overview with fixed sample message traffic.
//!
//! The message log is demo data and never changes. The only live state is
//! the displayed clock, advanced once per second by [`CommunicationOverview::tick`],
//! and the auto-refresh flag.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outbound,
    Inbound,
}

/// A response received for a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    #[serde(rename = "type")]
    pub kind: String,
    pub time: String,
    pub status: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationMessage {
    pub id: String,
    pub timestamp: String,
    pub direction: Direction,
    pub message_type: String,
    pub sender: String,
    pub receiver: String,
    pub status: String,
    #[serde(rename = "totalMW")]
    pub total_mw: f64,
    pub business_types: Vec<String>,
    pub responses: Vec<MessageResponse>,
}

/// Display class of a message status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusClass {
    Online,
    Warning,
    Active,
}

impl StatusClass {
    pub fn of(status: &str) -> Self {
        match status {
            "acknowledged" | "confirmed" | "processed" | "responded" => StatusClass::Online,
            "anomaly" => StatusClass::Warning,
            _ => StatusClass::Active,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationStats {
    pub total: usize,
    pub outbound: usize,
    pub inbound: usize,
    /// Nothing is ever pending in the sample data.
    pub pending: usize,
    pub anomalies: usize,
}

impl CommunicationStats {
    pub fn of(messages: &[CommunicationMessage]) -> Self {
        let outbound = messages
            .iter()
            .filter(|m| m.direction == Direction::Outbound)
            .count();
        Self {
            total: messages.len(),
            outbound,
            inbound: messages.len() - outbound,
            pending: 0,
            anomalies: messages.iter().filter(|m| m.status == "anomaly").count(),
        }
    }
}

fn response(kind: &str, time: &str, status: &str, text: &str) -> MessageResponse {
    MessageResponse {
        kind: kind.to_string(),
        time: time.to_string(),
        status: status.to_string(),
        text: text.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn message(
    id: &str,
    timestamp: &str,
    direction: Direction,
    message_type: &str,
    sender: &str,
    status: &str,
    total_mw: f64,
    business_types: &[&str],
    responses: Vec<MessageResponse>,
) -> CommunicationMessage {
    CommunicationMessage {
        id: id.to_string(),
        timestamp: timestamp.to_string(),
        direction,
        message_type: message_type.to_string(),
        sender: sender.to_string(),
        receiver: "TransnetBW".to_string(),
        status: status.to_string(),
        total_mw,
        business_types: business_types.iter().map(|s| s.to_string()).collect(),
        responses,
    }
}

/// The fixed demo message log, newest first.
pub fn sample_messages() -> Vec<CommunicationMessage> {
    vec![
        message(
            "MSG-20240904-001",
            "2024-09-04T13:52:15Z",
            Direction::Outbound,
            "Schedule",
            "BG-ENBW-001",
            "acknowledged",
            1245.5,
            &["A01", "A04", "A06"],
            vec![response("ACK", "13:52:18", "success", "Message fully accepted")],
        ),
        message(
            "MSG-20240904-002",
            "2024-09-04T13:45:22Z",
            Direction::Outbound,
            "Schedule",
            "BG-SOLAR-15",
            "confirmed",
            85.2,
            &["A01"],
            vec![
                response("ACK", "13:45:24", "success", "Message accepted"),
                response("CNF", "13:48:15", "success", "Schedule confirmed"),
            ],
        ),
        message(
            "MSG-20240904-003",
            "2024-09-04T13:38:45Z",
            Direction::Outbound,
            "Schedule",
            "BG-WIND-07",
            "anomaly",
            420.8,
            &["A01", "A04"],
            vec![
                response("ACK", "13:38:48", "success", "Message accepted"),
                response("ANO", "13:42:12", "warning", "Time series not matching"),
            ],
        ),
        message(
            "MSG-20240904-004",
            "2024-09-04T13:35:12Z",
            Direction::Inbound,
            "CNF",
            "Amprion",
            "processed",
            156.0,
            &["A06"],
            Vec::new(),
        ),
        message(
            "MSG-20240904-005",
            "2024-09-04T13:28:33Z",
            Direction::Outbound,
            "StatusRequest",
            "BG-HYDRO-02",
            "responded",
            0.0,
            &[],
            vec![response("CNF", "13:28:35", "success", "Status provided")],
        ),
    ]
}

/// Clock and refresh state of the overview page.
#[derive(Debug, Clone)]
pub struct CommunicationOverview {
    messages: Vec<CommunicationMessage>,
    current_time: DateTime<Utc>,
    auto_refresh: bool,
}

impl Default for CommunicationOverview {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl CommunicationOverview {
    /// Overview over the sample log with auto refresh on.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            messages: sample_messages(),
            current_time: now,
            auto_refresh: true,
        }
    }

    pub fn messages(&self) -> &[CommunicationMessage] {
        &self.messages
    }

    pub fn stats(&self) -> CommunicationStats {
        CommunicationStats::of(&self.messages)
    }

    pub fn auto_refresh(&self) -> bool {
        self.auto_refresh
    }

    /// Flip auto refresh. Returns the new value.
    pub fn toggle_auto_refresh(&mut self) -> bool {
        self.auto_refresh = !self.auto_refresh;
        self.auto_refresh
    }

    pub fn current_time(&self) -> DateTime<Utc> {
        self.current_time
    }

    /// Advance the displayed clock.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        self.current_time = now;
    }

    /// Clock as shown on the page, `HH:MM:SS` in local time.
    pub fn clock_display(&self) -> String {
        self.current_time
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string()
    }
}
