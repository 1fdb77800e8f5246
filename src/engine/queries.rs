use std::time::Instant;

use crate::model::*;
use crate::observability;
use crate::validate::{self, parse_date, RawAvailabilityRequest, ValidationError};

use super::availability::{check_availability, free_windows};
use super::pricing::estimate_price;
use super::{Engine, EngineError};

impl Engine {
    /// Validate, look up, decide, assemble. Exactly one outcome per call.
    pub fn check(&self, raw: &RawAvailabilityRequest) -> Result<AvailabilityResponse, EngineError> {
        let started = Instant::now();
        let result = self.check_inner(raw);
        observability::record_check(&result, started.elapsed());
        result
    }

    fn check_inner(
        &self,
        raw: &RawAvailabilityRequest,
    ) -> Result<AvailabilityResponse, EngineError> {
        let request = validate::validate(raw, self.policy)?;
        let resource = self.registry.get(&request.resource_id)?;
        let availability =
            check_availability(resource, &request.date, request.start, request.duration)?;
        let price = resource
            .pricing
            .as_ref()
            .map(|p| estimate_price(p, request.duration));
        Ok(AvailabilityResponse::new(&request, &availability, price))
    }

    /// Every free window of a resource on `date`.
    pub fn free_windows(&self, resource_id: &str, date: &str) -> Result<FreeWindows, EngineError> {
        if parse_date(date).is_none() {
            return Err(ValidationError::invalid_date().into());
        }
        let resource = self.registry.get(resource_id)?;
        Ok(FreeWindows {
            resource_id: resource.id.clone(),
            date: date.to_string(),
            open_hours: resource.open_hours.into(),
            free: free_windows(resource, date)
                .into_iter()
                .map(TimeRange::from)
                .collect(),
        })
    }

    pub fn list_resources(&self) -> Vec<ResourceInfo> {
        self.registry.list().into_iter().map(ResourceInfo::from).collect()
    }
}
