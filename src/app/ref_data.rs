//! Dependent city -> area dropdown state.
//!
//! Area options arrive asynchronously after a city is picked. Each city
//! selection bumps a generation counter and responses carry the generation
//! they were requested under; a response for an older generation is dropped.
//! Without this, a slow fetch for the previous city could overwrite the
//! options of the current one.

use crate::app::api::RefOption;

/// State machine for the city/area pair of a form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AreaCascade {
    pub city: Option<String>,
    pub area: Option<String>,
    pub options: Vec<RefOption>,
    pub loading: bool,
    generation: u64,
}

impl AreaCascade {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a saved city/area pair (edit forms) without clearing the area
    pub fn restore(&mut self, city: String, area: String) -> u64 {
        self.city = Some(city);
        self.area = Some(area);
        self.options.clear();
        self.loading = true;
        self.generation += 1;
        self.generation
    }

    /// Pick a city. Clears the current area and options, and returns the
    /// generation the caller must echo back with the fetched options.
    pub fn select_city(&mut self, city: String) -> u64 {
        self.city = Some(city);
        self.area = None;
        self.options.clear();
        self.loading = true;
        self.generation += 1;
        self.generation
    }

    pub fn select_area(&mut self, area: String) {
        self.area = Some(area);
    }

    /// Install fetched options if they belong to the current generation.
    /// Returns whether the response was applied.
    pub fn apply_options(&mut self, generation: u64, options: Vec<RefOption>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.options = options;
        self.loading = false;
        true
    }

    /// A failed fetch for the current generation just stops the spinner
    pub fn apply_error(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.loading = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(names: &[&str]) -> Vec<RefOption> {
        names
            .iter()
            .map(|n| RefOption {
                id: format!("id-{n}"),
                name: n.to_string(),
                city_name: None,
            })
            .collect()
    }

    #[test]
    fn selecting_a_city_clears_the_area() {
        let mut cascade = AreaCascade::new();
        let g = cascade.select_city("Pune".into());
        cascade.apply_options(g, opts(&["Kothrud"]));
        cascade.select_area("Kothrud".into());

        cascade.select_city("Mumbai".into());

        assert_eq!(cascade.city.as_deref(), Some("Mumbai"));
        assert_eq!(cascade.area, None);
        assert!(cascade.options.is_empty());
        assert!(cascade.loading);
    }

    #[test]
    fn stale_responses_are_discarded() {
        let mut cascade = AreaCascade::new();
        let g_pune = cascade.select_city("Pune".into());
        let g_mumbai = cascade.select_city("Mumbai".into());

        // The Pune response arrives late, after Mumbai was picked
        assert!(!cascade.apply_options(g_pune, opts(&["Kothrud"])));
        assert!(cascade.options.is_empty());
        assert!(cascade.loading);

        assert!(cascade.apply_options(g_mumbai, opts(&["Andheri", "Bandra"])));
        let names: Vec<&str> = cascade.options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Andheri", "Bandra"]);
        assert!(!cascade.loading);
    }

    #[test]
    fn stale_errors_are_discarded_too() {
        let mut cascade = AreaCascade::new();
        let g_old = cascade.select_city("Pune".into());
        let g_new = cascade.select_city("Mumbai".into());

        assert!(!cascade.apply_error(g_old));
        assert!(cascade.loading);

        assert!(cascade.apply_error(g_new));
        assert!(!cascade.loading);
    }

    #[test]
    fn restore_keeps_the_saved_area() {
        let mut cascade = AreaCascade::new();
        let g = cascade.restore("Pune".into(), "Kothrud".into());

        assert_eq!(cascade.area.as_deref(), Some("Kothrud"));
        cascade.apply_options(g, opts(&["Kothrud", "Baner"]));
        assert_eq!(cascade.area.as_deref(), Some("Kothrud"));
    }

    #[test]
    fn reselecting_the_same_city_still_refetches() {
        let mut cascade = AreaCascade::new();
        let g1 = cascade.select_city("Pune".into());
        let g2 = cascade.select_city("Pune".into());

        assert_ne!(g1, g2);
        assert!(!cascade.apply_options(g1, opts(&["Old"])));
        assert!(cascade.apply_options(g2, opts(&["New"])));
    }
}
