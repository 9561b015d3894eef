use crate::models::{Assignment, Company, Project};

/// Independent tests a record can be put through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    Province,
    Status,
    MinBudget,
    Search,
}

/// Field access the filter needs. A kind lists the criteria it supports in
/// `CRITERIA`; accessors for fields it does not carry keep the default `None`.
pub trait Filterable {
    const CRITERIA: &'static [Criterion];

    fn province(&self) -> Option<&str> {
        None
    }

    fn status(&self) -> Option<&str> {
        None
    }

    fn budget(&self) -> Option<f64> {
        None
    }

    /// Fields the free-text search looks at.
    fn search_fields(&self) -> Vec<&str>;
}

impl Filterable for Project {
    const CRITERIA: &'static [Criterion] = &[
        Criterion::Province,
        Criterion::Status,
        Criterion::MinBudget,
        Criterion::Search,
    ];

    fn province(&self) -> Option<&str> {
        Some(&self.province)
    }

    fn status(&self) -> Option<&str> {
        Some(&self.status)
    }

    fn budget(&self) -> Option<f64> {
        Some(self.budget)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.province, &self.city]
    }
}

impl Filterable for Company {
    const CRITERIA: &'static [Criterion] = &[Criterion::Province, Criterion::Search];

    fn province(&self) -> Option<&str> {
        Some(&self.province)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.province, &self.city]
    }
}

impl Filterable for Assignment {
    const CRITERIA: &'static [Criterion] = &[Criterion::Search];

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.project_name, &self.company_name, &self.project_province]
    }
}

/// Current values of a view's filter controls.
///
/// Empty or `"All"` values are inactive and match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    pub province: Option<String>,
    pub status: Option<String>,
    /// Entered in billions.
    pub min_budget_billions: Option<f64>,
    pub search: String,
}

fn active(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

impl Criteria {
    /// Minimum budget in currency units.
    pub fn min_budget(&self) -> Option<f64> {
        self.min_budget_billions.map(|b| b * 1e9)
    }

    /// Read the minimum budget from typed text; anything unparsable clears it.
    pub fn set_min_budget_text(&mut self, text: &str) {
        self.min_budget_billions = text.replace(',', "").trim().parse().ok();
    }

    pub fn is_active(&self, criterion: Criterion) -> bool {
        match criterion {
            Criterion::Province => active(&self.province).is_some(),
            Criterion::Status => active(&self.status).is_some(),
            Criterion::MinBudget => self.min_budget_billions.is_some(),
            Criterion::Search => !self.search.trim().is_empty(),
        }
    }

    pub fn matches<R: Filterable>(&self, record: &R) -> bool {
        self.matches_province(record)
            && self.matches_status(record)
            && self.matches_budget(record)
            && self.matches_search(record)
    }

    fn matches_province<R: Filterable>(&self, record: &R) -> bool {
        match active(&self.province) {
            None => true,
            Some(province) => record.province() == Some(province),
        }
    }

    fn matches_status<R: Filterable>(&self, record: &R) -> bool {
        match active(&self.status) {
            None => true,
            Some(status) => record.status() == Some(status),
        }
    }

    fn matches_budget<R: Filterable>(&self, record: &R) -> bool {
        match self.min_budget() {
            None => true,
            Some(min) => record.budget().is_some_and(|budget| budget >= min),
        }
    }

    fn matches_search<R: Filterable>(&self, record: &R) -> bool {
        let term = self.search.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        record
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

/// Records passing every active criterion, in collection order.
pub fn apply<'a, R: Filterable>(records: &'a [R], criteria: &Criteria) -> Vec<&'a R> {
    records.iter().filter(|r| criteria.matches(*r)).collect()
}

/// Step a selector through `options`, with `None` ("All") before the first
/// and after the last option.
pub fn cycle(current: &Option<String>, options: &[&str]) -> Option<String> {
    let next = match current.as_deref() {
        None => 0,
        Some(value) => match options.iter().position(|o| *o == value) {
            Some(i) => i + 1,
            None => 0,
        },
    };
    options.get(next).map(|o| o.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str, province: &str, city: &str, status: &str, budget: f64) -> Project {
        Project {
            id: None,
            name: name.into(),
            status: status.into(),
            province: province.into(),
            city: city.into(),
            budget,
            latitude: None,
            longitude: None,
            description: None,
            reason: None,
            planned_date: None,
        }
    }

    #[test]
    fn province_and_budget_combine_conjunctively() {
        let records = vec![
            project("Eglinton Crosstown", "Ontario", "Toronto", "In-Progress", 1.5e9),
            project("Ontario Line", "Ontario", "Toronto", "Planned", 2e9),
            project("Site C", "British Columbia", "Fort St. John", "In-Progress", 16e9),
        ];
        let criteria = Criteria {
            province: Some("Ontario".into()),
            min_budget_billions: Some(2.0),
            ..Criteria::default()
        };

        let names: Vec<_> = apply(&records, &criteria).iter().map(|p| p.name.as_str()).collect();

        assert_eq!(names, vec!["Ontario Line"]);
    }

    #[test]
    fn typed_budget_text_sets_or_clears_the_minimum() {
        let mut criteria = Criteria::default();
        criteria.set_min_budget_text("1,5");
        assert_eq!(criteria.min_budget_billions, Some(15.0));

        criteria.set_min_budget_text(" 2.5 ");
        assert_eq!(criteria.min_budget(), Some(2.5e9));

        criteria.set_min_budget_text("");
        assert!(!criteria.is_active(Criterion::MinBudget));
    }

    #[test]
    fn inactive_criteria_match_everything() {
        let records = vec![
            project("A", "Ontario", "Ottawa", "Planned", 1.0),
            project("B", "Quebec", "Laval", "Completed", 2.0),
        ];
        let criteria = Criteria {
            province: Some("All".into()),
            status: Some(String::new()),
            search: "  ".into(),
            ..Criteria::default()
        };

        assert_eq!(apply(&records, &criteria).len(), 2);
        assert!(!criteria.is_active(Criterion::Province));
        assert!(!criteria.is_active(Criterion::Search));
    }

    #[test]
    fn search_is_case_insensitive_over_name_province_and_city() {
        let records = vec![
            project("Réseau express", "Quebec", "Montreal", "In-Progress", 1.0),
            project("Valley Line", "Alberta", "Edmonton", "Completed", 1.0),
            project("Confederation Line", "Ontario", "Ottawa", "Completed", 1.0),
        ];

        let by_city = Criteria { search: "EDMON".into(), ..Criteria::default() };
        assert_eq!(apply(&records, &by_city)[0].name, "Valley Line");

        let by_province = Criteria { search: "quebec".into(), ..Criteria::default() };
        assert_eq!(apply(&records, &by_province)[0].name, "Réseau express");

        let by_name = Criteria { search: "line".into(), ..Criteria::default() };
        let names: Vec<_> = apply(&records, &by_name).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Valley Line", "Confederation Line"]);
    }

    #[test]
    fn status_filter_is_exact() {
        let records = vec![
            project("A", "Ontario", "Ottawa", "In-Progress", 1.0),
            project("B", "Ontario", "Ottawa", "Completed", 1.0),
        ];
        let criteria = Criteria { status: Some("Completed".into()), ..Criteria::default() };
        assert_eq!(apply(&records, &criteria)[0].name, "B");
    }

    #[test]
    fn kinds_without_a_field_never_match_its_criterion() {
        let assignment = Assignment {
            id: 1,
            project_id: 2,
            company_id: 3,
            project_name: "Site C".into(),
            company_name: "PCL".into(),
            project_city: "Fort St. John".into(),
            project_province: "British Columbia".into(),
            project_status: "In-Progress".into(),
            created_at: None,
        };

        let search = Criteria { search: "pcl".into(), ..Criteria::default() };
        assert!(search.matches(&assignment));

        let province = Criteria { province: Some("British Columbia".into()), ..Criteria::default() };
        assert!(!province.matches(&assignment));
        assert!(!Assignment::CRITERIA.contains(&Criterion::Province));
    }

    #[test]
    fn cycle_wraps_through_all() {
        let options = ["Planned", "Completed"];
        let first = cycle(&None, &options);
        assert_eq!(first.as_deref(), Some("Planned"));
        let second = cycle(&first, &options);
        assert_eq!(second.as_deref(), Some("Completed"));
        assert_eq!(cycle(&second, &options), None);
    }
}
