use crate::types::HealthRes;

/// Health service shared by every HTTP surface.
///
/// The caller probes the store (for example with a record count) and hands the outcome
/// over; this service only decides what the response looks like.
pub struct HealthService;

impl HealthService {
    /// Build the health response from the result of a store probe.
    ///
    /// # Arguments
    /// * `probe` - number of stored records, or the reason the store could not be reached
    pub fn check_health<E: std::fmt::Display>(probe: Result<i64, E>) -> HealthRes {
        match probe {
            Ok(records) => HealthRes {
                ok: true,
                message: "DTR is alive".into(),
                records: Some(records),
            },
            Err(e) => HealthRes {
                ok: false,
                message: format!("DTR store unavailable: {e}"),
                records: None,
            },
        }
    }
}
