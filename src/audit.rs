//! Audit events emitted around each analysis.
//!
//! Events carry metadata only. Clause text never appears in an event.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::{ContractType, RiskCategory, TextEncoding};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEvent {
    DocumentReceived {
        byte_length: usize,
        encoding: TextEncoding,
    },
    AnalysisCompleted {
        clause_count: usize,
        finding_count: usize,
        overall_score: u8,
        contract_type: ContractType,
        category_counts: BTreeMap<RiskCategory, usize>,
    },
    AnalysisFailed {
        /// Display form of the error; never includes document text
        reason: String,
    },
}

/// Receives audit events. Implementations must tolerate concurrent calls.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: &AuditEvent);
}

/// Forwards events to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: &AuditEvent) {
        match event {
            AuditEvent::DocumentReceived {
                byte_length,
                encoding,
            } => {
                tracing::info!(byte_length, ?encoding, "document received");
            }
            AuditEvent::AnalysisCompleted {
                clause_count,
                finding_count,
                overall_score,
                contract_type,
                category_counts,
            } => {
                tracing::info!(
                    clause_count,
                    finding_count,
                    overall_score,
                    %contract_type,
                    ?category_counts,
                    "analysis completed"
                );
            }
            AuditEvent::AnalysisFailed { reason } => {
                tracing::info!(%reason, "analysis failed");
            }
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<AuditEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: &AuditEvent) {
        let mut events = match self.events.lock() {
            Ok(events) => events,
            Err(poisoned) => poisoned.into_inner(),
        };
        events.push(event.clone());
    }
}
