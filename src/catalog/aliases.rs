//! Known external header spellings
//!
//! Operational tools export the same columns under many names, including
//! French and German variants. Keys are stored lowercased; lookup is
//! case-insensitive exact match.

use super::Field;

static ALIASES: &[(&str, Field)] = &[
    // task_reference
    ("to ref.", Field::TaskReference),
    ("to ref", Field::TaskReference),
    ("to reference", Field::TaskReference),
    ("transport order", Field::TaskReference),
    ("transport order ref", Field::TaskReference),
    ("order ref", Field::TaskReference),
    ("reference", Field::TaskReference),
    ("référence", Field::TaskReference),
    ("référence to", Field::TaskReference),
    ("referenz", Field::TaskReference),
    ("to-nummer", Field::TaskReference),
    ("auftragsnummer", Field::TaskReference),
    // status
    ("to status", Field::Status),
    ("to-status", Field::Status),
    ("status", Field::Status),
    ("statut", Field::Status),
    ("statut to", Field::Status),
    ("bearbeitungsstatus", Field::Status),
    // assignee
    ("assignee", Field::Assignee),
    ("assigned to", Field::Assignee),
    ("owner", Field::Assignee),
    ("responsable", Field::Assignee),
    ("bearbeiter", Field::Assignee),
    ("sachbearbeiter", Field::Assignee),
    // delay_days
    ("delay", Field::DelayDays),
    ("delay days", Field::DelayDays),
    ("delay (days)", Field::DelayDays),
    ("retard", Field::DelayDays),
    ("retard (jours)", Field::DelayDays),
    ("verspätung", Field::DelayDays),
    ("verspätung (tage)", Field::DelayDays),
    // net_amount
    ("net amount", Field::NetAmount),
    ("net", Field::NetAmount),
    ("amount", Field::NetAmount),
    ("montant net", Field::NetAmount),
    ("montant", Field::NetAmount),
    ("nettobetrag", Field::NetAmount),
    // transport_mode
    ("transport mode", Field::TransportMode),
    ("mode", Field::TransportMode),
    ("mode of transport", Field::TransportMode),
    ("mode de transport", Field::TransportMode),
    ("transportart", Field::TransportMode),
    ("verkehrsträger", Field::TransportMode),
    // comments
    ("comments", Field::Comments),
    ("comment", Field::Comments),
    ("notes", Field::Comments),
    ("commentaires", Field::Comments),
    ("remarques", Field::Comments),
    ("kommentar", Field::Comments),
    ("bemerkungen", Field::Comments),
    // resolution_admin
    ("resolution admin", Field::ResolutionAdmin),
    ("admin", Field::ResolutionAdmin),
    ("admin résolution", Field::ResolutionAdmin),
    ("klärung durch", Field::ResolutionAdmin),
    // resolution_status
    ("resolution status", Field::ResolutionStatus),
    ("resolution", Field::ResolutionStatus),
    ("statut résolution", Field::ResolutionStatus),
    ("klärungsstatus", Field::ResolutionStatus),
    // resolution_time_days
    ("resolution time", Field::ResolutionTimeDays),
    ("resolution time (days)", Field::ResolutionTimeDays),
    ("time to resolution", Field::ResolutionTimeDays),
    ("temps de résolution", Field::ResolutionTimeDays),
    ("temps de résolution (jours)", Field::ResolutionTimeDays),
    ("klärungsdauer (tage)", Field::ResolutionTimeDays),
];

/// Look up a CSV header in the alias table
pub fn lookup(header: &str) -> Option<Field> {
    let needle = header.trim().to_lowercase();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == needle)
        .map(|(_, field)| *field)
}
