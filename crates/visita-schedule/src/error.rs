//! Error types for appointment scheduling.
//!
//! Display strings are the text shown to the user in the chat transcript.

/// Errors from proposing a visit or fetching the technician directory.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulingError {
    #[error("Selecione um técnico e uma data para agendar a visita.")]
    IncompleteRequest,
    #[error("Data inválida: {0}")]
    InvalidDate(String),
    #[error("Não é possível agendar uma visita para uma data passada ({0}).")]
    PastDate(String),
    #[error("O Técnico {technician_id} já possui uma visita agendada para {scheduled_at}.")]
    DoubleBooking {
        technician_id: u32,
        scheduled_at: String,
    },
    #[error("Não foi possível carregar a lista de técnicos: {0}")]
    DirectoryUnavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheduling_error_display() {
        assert_eq!(
            SchedulingError::IncompleteRequest.to_string(),
            "Selecione um técnico e uma data para agendar a visita."
        );
        assert_eq!(
            SchedulingError::InvalidDate("amanhã".to_string()).to_string(),
            "Data inválida: amanhã"
        );
        assert_eq!(
            SchedulingError::PastDate("01/01/2000, 10:00".to_string()).to_string(),
            "Não é possível agendar uma visita para uma data passada (01/01/2000, 10:00)."
        );
        assert_eq!(
            SchedulingError::DirectoryUnavailable("connection refused".to_string()).to_string(),
            "Não foi possível carregar a lista de técnicos: connection refused"
        );
    }

    #[test]
    fn test_double_booking_names_technician() {
        let err = SchedulingError::DoubleBooking {
            technician_id: 7,
            scheduled_at: "01/01/2030, 10:00".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Técnico 7"));
        assert!(msg.contains("01/01/2030, 10:00"));
    }

    #[test]
    fn test_errors_implement_debug() {
        let dbg = format!("{:?}", SchedulingError::IncompleteRequest);
        assert!(dbg.contains("IncompleteRequest"));

        let dbg = format!("{:?}", SchedulingError::PastDate(String::new()));
        assert!(dbg.contains("PastDate"));
    }
}
