//! Overall health aggregation.
//!
//! Computes one system-wide status from the per-service statuses using the
//! usual "red wins" dashboard convention: any single down or degraded service
//! is visible at the top-level indicator no matter how many healthy services
//! surround it.

use super::model::{Service, ServiceStatus};

/// Returns the worst status present, by severity rank
/// (`down > degraded > unknown > healthy`).
///
/// An empty slice aggregates to [`ServiceStatus::Unknown`]: with nothing
/// monitored there is no evidence the system is healthy.
///
/// Pure function; the server sends its own `overall_health` alongside the
/// services and the dashboard displays that, but this local computation is
/// kept to cross-check the two.
pub fn aggregate(services: &[Service]) -> ServiceStatus {
    services
        .iter()
        .map(|s| s.status)
        .max_by_key(|s| s.severity_rank())
        .unwrap_or(ServiceStatus::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ServiceKind;

    fn service(name: &str, status: ServiceStatus) -> Service {
        Service {
            name: name.to_string(),
            kind: ServiceKind::Database,
            status,
            response_time: None,
            last_checked: "2025-04-01T12:00:00Z".to_string(),
            error: None,
            additional_info: None,
        }
    }

    #[test]
    fn test_empty_aggregates_to_unknown() {
        assert_eq!(aggregate(&[]), ServiceStatus::Unknown);
    }

    #[test]
    fn test_all_healthy() {
        let services = vec![
            service("a", ServiceStatus::Healthy),
            service("b", ServiceStatus::Healthy),
        ];
        assert_eq!(aggregate(&services), ServiceStatus::Healthy);
    }

    #[test]
    fn test_single_down_wins_over_many_healthy() {
        let mut services: Vec<Service> =
            (0..20).map(|i| service(&format!("ok-{i}"), ServiceStatus::Healthy)).collect();
        services.insert(7, service("bad", ServiceStatus::Down));
        assert_eq!(aggregate(&services), ServiceStatus::Down);
    }

    #[test]
    fn test_degraded_wins_over_unknown_and_healthy() {
        let services = vec![
            service("a", ServiceStatus::Healthy),
            service("b", ServiceStatus::Unknown),
            service("c", ServiceStatus::Degraded),
        ];
        assert_eq!(aggregate(&services), ServiceStatus::Degraded);
    }

    #[test]
    fn test_unknown_wins_over_healthy() {
        let services = vec![
            service("a", ServiceStatus::Healthy),
            service("b", ServiceStatus::Unknown),
        ];
        assert_eq!(aggregate(&services), ServiceStatus::Unknown);
    }
}
