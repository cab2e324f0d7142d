//! Result records produced by the calculators.
use crate::core::currency::CurrencyCode;
use serde::Serialize;

/// How a figure should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "currency", rename_all = "snake_case")]
pub enum Unit {
    /// An amount in the user's display currency.
    Money,
    /// An amount in a specific currency.
    Currency(CurrencyCode),
    Percent,
    Years,
    Months,
    Units,
    Litres,
    Number,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub label: String,
    pub value: f64,
    pub unit: Unit,
}

impl Figure {
    pub fn new(label: impl Into<String>, value: f64, unit: Unit) -> Self {
        Self {
            label: label.into(),
            value,
            unit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub title: String,
    pub headline: Figure,
    pub details: Vec<Figure>,
    pub note: Option<String>,
}

impl Report {
    pub fn new(title: impl Into<String>, headline: Figure) -> Self {
        Self {
            title: title.into(),
            headline,
            details: Vec::new(),
            note: None,
        }
    }

    pub fn with_detail(mut self, label: impl Into<String>, value: f64, unit: Unit) -> Self {
        self.details.push(Figure::new(label, value, unit));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Looks up a figure by label, headline included.
    pub fn figure(&self, label: &str) -> Option<&Figure> {
        std::iter::once(&self.headline)
            .chain(self.details.iter())
            .find(|f| f.label == label)
    }

    pub fn value(&self, label: &str) -> Option<f64> {
        self.figure(label).map(|f| f.value)
    }

    /// The first figure whose value is NaN or infinite.
    pub fn non_finite(&self) -> Option<&Figure> {
        std::iter::once(&self.headline)
            .chain(self.details.iter())
            .find(|f| !f.value.is_finite())
    }
}
