use std::path::PathBuf;
use std::time::Instant;

use crate::config::Config;
use crate::dataset::{Dataset, DatasetConfig, ListingFilter};
use crate::pipeline::{self, RankRequest};
use crate::scoring::{ScoreError, ScoredNeighborhood, ScoringOptions, WeightConfig};
use crate::tui::theme::ThemeColors;

pub const BUDGET_MIN: f64 = 5_000.0;
pub const BUDGET_MAX: f64 = 100_000.0;
pub const BUDGET_DEFAULT: f64 = 35_000.0;
pub const MIN_SAFETY_DEFAULT: f64 = 7.0;

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Help,
    ScoreBreakdown,
}

/// One adjustable control in the slider panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slider {
    Cafe,
    Metro,
    Safety,
    Budget,
    MinSafety,
}

impl Slider {
    pub const ALL: [Slider; 5] = [
        Slider::Cafe,
        Slider::Metro,
        Slider::Safety,
        Slider::Budget,
        Slider::MinSafety,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Slider::Cafe => "Cafe weight",
            Slider::Metro => "Metro weight",
            Slider::Safety => "Safety weight",
            Slider::Budget => "Max budget",
            Slider::MinSafety => "Min safety",
        }
    }

    /// (min, max, step)
    pub fn range(self) -> (f64, f64, f64) {
        match self {
            Slider::Cafe | Slider::Metro | Slider::Safety => (0.0, 1.0, 0.05),
            Slider::Budget => (BUDGET_MIN, BUDGET_MAX, 1_000.0),
            Slider::MinSafety => (1.0, 10.0, 0.5),
        }
    }

    fn position(self) -> usize {
        Slider::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn next(self) -> Slider {
        Slider::ALL[(self.position() + 1) % Slider::ALL.len()]
    }

    pub fn previous(self) -> Slider {
        let len = Slider::ALL.len();
        Slider::ALL[(self.position() + len - 1) % len]
    }
}

/// Move `value` by `steps` slider notches, snapped to the step grid and clamped.
pub fn step_value(value: f64, steps: i32, (min, max, step): (f64, f64, f64)) -> f64 {
    let notch = (value / step).round() + f64::from(steps);
    // Snap to two decimals so 0.05 steps don't accumulate float noise
    let snapped = ((notch * step) * 100.0).round() / 100.0;
    snapped.clamp(min, max)
}

pub struct App {
    pub dataset: Dataset,
    /// Where the dataset came from, for reloads
    pub source: Option<(PathBuf, DatasetConfig)>,
    pub weights: WeightConfig,
    pub options: ScoringOptions,
    pub budget: f64,
    pub min_safety: f64,
    pub focused: Slider,
    pub entries: Vec<ScoredNeighborhood>,
    pub filtered_out: usize,
    /// Shown in place of the table when nothing could be ranked
    pub empty_message: Option<String>,
    pub table_state: ratatui::widgets::TableState,
    pub input_mode: InputMode,
    pub flash_message: Option<(String, Instant)>,
    pub needs_reload: bool,
    pub is_loading: bool,
    pub spinner_frame: usize,
    pub should_quit: bool,
    pub theme: ThemeColors,
    initial: (WeightConfig, f64, f64),
}

impl App {
    /// Seed the sliders from config and run the first ranking.
    pub fn new(
        dataset: Dataset,
        source: Option<(PathBuf, DatasetConfig)>,
        config: &Config,
        theme: ThemeColors,
    ) -> Self {
        let budget = config
            .filters
            .max_rent
            .unwrap_or(BUDGET_DEFAULT)
            .clamp(BUDGET_MIN, BUDGET_MAX);
        let min_safety = config
            .filters
            .min_safety
            .unwrap_or(MIN_SAFETY_DEFAULT)
            .clamp(1.0, 10.0);

        let mut app = Self {
            dataset,
            source,
            weights: config.weights,
            options: config.scoring,
            budget,
            min_safety,
            focused: Slider::Cafe,
            entries: Vec::new(),
            filtered_out: 0,
            empty_message: None,
            table_state: ratatui::widgets::TableState::default(),
            input_mode: InputMode::Normal,
            flash_message: None,
            needs_reload: false,
            is_loading: false,
            spinner_frame: 0,
            should_quit: false,
            theme,
            initial: (config.weights, budget, min_safety),
        };
        app.recompute();
        app
    }

    /// Fresh request from the current slider values.
    pub fn request(&self) -> RankRequest {
        RankRequest {
            weights: self.weights,
            options: self.options,
            filter: ListingFilter {
                max_rent: Some(self.budget),
                min_safety: Some(self.min_safety),
            },
        }
    }

    /// Re-run the pipeline with the current sliders.
    pub fn recompute(&mut self) {
        let request = self.request();
        match pipeline::rank(&self.dataset, &request) {
            Ok(ranking) => {
                self.entries = ranking.entries;
                self.filtered_out = ranking.filtered_out;
                self.empty_message = None;
            }
            Err(ScoreError::EmptyDataset) => {
                self.entries.clear();
                self.filtered_out = self.dataset.len();
                self.empty_message = Some(pipeline::no_match_hint(&request.filter));
            }
            Err(e) => {
                self.entries.clear();
                self.filtered_out = 0;
                self.empty_message = Some(e.to_string());
            }
        }
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        if self.entries.is_empty() {
            self.table_state.select(None);
        } else {
            match self.table_state.selected() {
                Some(selected) if selected >= self.entries.len() => {
                    self.table_state.select(Some(self.entries.len() - 1))
                }
                Some(_) => {}
                None => self.table_state.select(Some(0)),
            }
        }
    }

    pub fn slider_value(&self, slider: Slider) -> f64 {
        match slider {
            Slider::Cafe => self.weights.cafe,
            Slider::Metro => self.weights.metro,
            Slider::Safety => self.weights.safety,
            Slider::Budget => self.budget,
            Slider::MinSafety => self.min_safety,
        }
    }

    fn set_slider_value(&mut self, slider: Slider, value: f64) {
        match slider {
            Slider::Cafe => self.weights.cafe = value,
            Slider::Metro => self.weights.metro = value,
            Slider::Safety => self.weights.safety = value,
            Slider::Budget => self.budget = value,
            Slider::MinSafety => self.min_safety = value,
        }
    }

    /// Nudge the focused slider and re-rank if it moved.
    pub fn adjust_focused(&mut self, steps: i32) {
        let slider = self.focused;
        let current = self.slider_value(slider);
        let next = step_value(current, steps, slider.range());
        if next != current {
            self.set_slider_value(slider, next);
            self.recompute();
        }
    }

    pub fn focus_next(&mut self) {
        self.focused = self.focused.next();
    }

    pub fn focus_previous(&mut self) {
        self.focused = self.focused.previous();
    }

    pub fn toggle_normalization(&mut self) {
        self.options.normalization = self.options.normalization.toggled();
        self.recompute();
        self.show_flash(format!(
            "Normalization: {}",
            self.options.normalization.label()
        ));
    }

    /// Put every slider back where the dashboard started.
    pub fn reset_sliders(&mut self) {
        let (weights, budget, min_safety) = self.initial;
        self.weights = weights;
        self.budget = budget;
        self.min_safety = min_safety;
        self.recompute();
        self.show_flash("Sliders reset".to_string());
    }

    /// Ask the run loop to reload the dataset from disk.
    pub fn request_reload(&mut self) {
        if self.source.is_some() {
            self.needs_reload = true;
        } else {
            self.show_flash("Error: dataset was not loaded from a file".to_string());
        }
    }

    /// Swap in a reloaded dataset and re-rank.
    pub fn replace_dataset(&mut self, dataset: Dataset) {
        self.dataset = dataset;
        self.recompute();
        self.show_flash(format!("Reloaded ({} neighborhoods)", self.dataset.len()));
    }

    pub fn next_row(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i >= self.entries.len() - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) => self.entries.len() - 1,
            Some(i) => i - 1,
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn selected_entry(&self) -> Option<&ScoredNeighborhood> {
        self.table_state.selected().and_then(|i| self.entries.get(i))
    }

    pub fn max_score(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.value_score)
            .fold(0.0_f64, f64::max)
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    /// Show help overlay
    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    /// Dismiss help overlay
    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Show score breakdown overlay
    pub fn show_score_breakdown(&mut self) {
        if self.selected_entry().is_some() {
            self.input_mode = InputMode::ScoreBreakdown;
        }
    }

    /// Dismiss score breakdown overlay
    pub fn dismiss_score_breakdown(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Advance the loading spinner animation frame
    pub fn advance_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::NeighborhoodRecord;
    use crate::scoring::Normalization;

    fn dataset() -> Dataset {
        Dataset::new(vec![
            NeighborhoodRecord::new("Koramangala", 30000.0, 40, 10.0, 8.0),
            NeighborhoodRecord::new("Whitefield", 20000.0, 10, 50.0, 7.5),
            NeighborhoodRecord::new("Jayanagar", 25000.0, 20, 20.0, 9.5),
            NeighborhoodRecord::new("Hebbal", 60000.0, 15, 12.0, 9.0),
        ])
    }

    fn app() -> App {
        App::new(dataset(), None, &Config::default(), ThemeColors::dark())
    }

    #[test]
    fn test_new_applies_default_filters() {
        let app = app();
        assert_eq!(app.budget, 35000.0);
        assert_eq!(app.min_safety, 7.0);
        // Hebbal is over budget
        assert_eq!(app.entries.len(), 3);
        assert_eq!(app.filtered_out, 1);
        assert_eq!(app.table_state.selected(), Some(0));
    }

    #[test]
    fn test_step_value_snaps_and_clamps() {
        let weight = Slider::Cafe.range();
        assert_eq!(step_value(0.5, 1, weight), 0.55);
        assert_eq!(step_value(0.98, 1, weight), 1.0);
        assert_eq!(step_value(0.0, -1, weight), 0.0);
        assert_eq!(step_value(35000.0, -2, Slider::Budget.range()), 33000.0);
        assert_eq!(step_value(5000.0, -1, Slider::Budget.range()), 5000.0);
        assert_eq!(step_value(9.5, 3, Slider::MinSafety.range()), 10.0);
    }

    #[test]
    fn test_weight_slider_changes_ranking() {
        let mut app = app();
        app.weights = WeightConfig::new(1.0, 0.0, 0.0);
        app.recompute();
        // Cafes per rupee: Koramangala 40/30000 leads
        assert_eq!(app.entries[0].record.name, "Koramangala");

        app.focused = Slider::Cafe;
        app.adjust_focused(-20);
        app.focused = Slider::Metro;
        app.adjust_focused(20);
        assert_eq!(app.weights, WeightConfig::new(0.0, 1.0, 0.0));
        // Metro per rupee: Whitefield 50/20000 leads
        assert_eq!(app.entries[0].record.name, "Whitefield");
    }

    #[test]
    fn test_budget_slider_filters() {
        let mut app = app();
        app.focused = Slider::Budget;
        // 35000 -> 20000
        app.adjust_focused(-15);
        assert_eq!(app.budget, 20000.0);
        assert_eq!(app.entries.len(), 1);
        assert_eq!(app.entries[0].record.name, "Whitefield");
    }

    #[test]
    fn test_filters_leave_nothing() {
        let mut app = app();
        app.budget = BUDGET_MIN;
        app.recompute();
        assert!(app.entries.is_empty());
        assert_eq!(app.table_state.selected(), None);
        let message = app.empty_message.as_deref().unwrap();
        assert!(message.contains("₹5000"));
        assert!(message.contains("Try increasing your budget"));
    }

    #[test]
    fn test_max_score_tracks_top_entry() {
        let mut app = app();
        assert_eq!(app.max_score(), app.entries[0].value_score);
        app.budget = BUDGET_MIN;
        app.recompute();
        assert_eq!(app.max_score(), 0.0);
    }

    #[test]
    fn test_toggle_normalization() {
        let mut app = app();
        app.toggle_normalization();
        assert_eq!(app.options.normalization, Normalization::MinMax);
        assert!(app.flash_message.is_some());
        app.toggle_normalization();
        assert_eq!(app.options.normalization, Normalization::None);
    }

    #[test]
    fn test_reset_sliders() {
        let mut app = app();
        app.focused = Slider::Safety;
        app.adjust_focused(4);
        app.focused = Slider::MinSafety;
        app.adjust_focused(-2);
        app.reset_sliders();
        assert_eq!(app.weights, WeightConfig::default());
        assert_eq!(app.min_safety, 7.0);
    }

    #[test]
    fn test_focus_cycles() {
        let mut app = app();
        app.focus_previous();
        assert_eq!(app.focused, Slider::MinSafety);
        app.focus_next();
        app.focus_next();
        assert_eq!(app.focused, Slider::Metro);
    }

    #[test]
    fn test_row_navigation_wraps() {
        let mut app = app();
        app.previous_row();
        assert_eq!(app.table_state.selected(), Some(2));
        app.next_row();
        assert_eq!(app.table_state.selected(), Some(0));
    }

    #[test]
    fn test_selection_clamped_after_filtering() {
        let mut app = app();
        app.table_state.select(Some(2));
        app.budget = 20000.0;
        app.recompute();
        assert_eq!(app.table_state.selected(), Some(0));
    }

    #[test]
    fn test_breakdown_requires_selection() {
        let mut app = app();
        app.budget = BUDGET_MIN;
        app.recompute();
        app.show_score_breakdown();
        assert_eq!(app.input_mode, InputMode::Normal);

        app.budget = BUDGET_MAX;
        app.recompute();
        app.show_score_breakdown();
        assert_eq!(app.input_mode, InputMode::ScoreBreakdown);
    }

    #[test]
    fn test_reload_without_source() {
        let mut app = app();
        app.request_reload();
        assert!(!app.needs_reload);
        assert!(app.flash_message.is_some());
    }

    #[test]
    fn test_replace_dataset_reranks() {
        let mut app = app();
        app.replace_dataset(Dataset::new(vec![NeighborhoodRecord::new(
            "Malleshwaram",
            18000.0,
            12,
            15.0,
            9.0,
        )]));
        assert_eq!(app.entries.len(), 1);
        assert_eq!(app.entries[0].record.name, "Malleshwaram");
    }
}
