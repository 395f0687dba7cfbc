use crate::error::{AppError, Result};
use crate::models::Route;
use serde::{Deserialize, Serialize};
use time::Date;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PlannedVacationRecord")]
pub struct PlannedVacation {
    pub name: String,
    pub starting_date: Date,
    pub route: Route,
}

impl PlannedVacation {
    pub fn new(name: impl Into<String>, starting_date: Date, route: Route) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AppError::InvalidArgument(
                "Vacation name must not be empty".to_string(),
            ));
        }
        Ok(PlannedVacation {
            name,
            starting_date,
            route,
        })
    }

    pub fn summary(&self) -> VacationSummary {
        VacationSummary {
            name: self.name.clone(),
            starting_date: self.starting_date,
            starting_address: self.route.starting_point().address().to_string(),
            total_distance_km: self.route.total_distance().round(),
            vehicle_name: self.route.vehicle_name().to_string(),
            vehicle_range_km: self.route.vehicle_range(),
            num_stops: self.route.num_stops(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PlannedVacationRecord {
    name: String,
    starting_date: Date,
    route: Route,
}

impl TryFrom<PlannedVacationRecord> for PlannedVacation {
    type Error = AppError;

    fn try_from(record: PlannedVacationRecord) -> Result<Self> {
        PlannedVacation::new(record.name, record.starting_date, record.route)
    }
}

/// One line of the vacation list. Distance is rounded to whole km for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VacationSummary {
    pub name: String,
    pub starting_date: Date,
    pub starting_address: String,
    pub total_distance_km: f64,
    pub vehicle_name: String,
    pub vehicle_range_km: f64,
    pub num_stops: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VacationList {
    #[serde(default)]
    planned_vacations: Vec<PlannedVacation>,
}

impl VacationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn planned_vacations(&self) -> &[PlannedVacation] {
        &self.planned_vacations
    }

    pub fn len(&self) -> usize {
        self.planned_vacations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planned_vacations.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&PlannedVacation> {
        self.planned_vacations
            .get(index)
            .ok_or(AppError::IndexOutOfRange {
                index,
                len: self.planned_vacations.len(),
            })
    }

    /// Insert keeping the list sorted by date; returns where the vacation landed.
    /// A vacation sharing its date with existing ones goes after them.
    pub fn add(&mut self, vacation: PlannedVacation) -> usize {
        self.sort_by_starting_date();
        let index = self
            .planned_vacations
            .partition_point(|v| v.starting_date <= vacation.starting_date);
        self.planned_vacations.insert(index, vacation);
        index
    }

    pub fn remove(&mut self, index: usize) -> Result<PlannedVacation> {
        if index >= self.planned_vacations.len() {
            return Err(AppError::IndexOutOfRange {
                index,
                len: self.planned_vacations.len(),
            });
        }
        Ok(self.planned_vacations.remove(index))
    }

    /// Stable ascending sort: vacations on the same day keep their relative order.
    pub fn sort_by_starting_date(&mut self) {
        self.planned_vacations.sort_by_key(|v| v.starting_date);
    }

    pub fn summaries(&self) -> Vec<VacationSummary> {
        self.planned_vacations
            .iter()
            .map(PlannedVacation::summary)
            .collect()
    }
}
