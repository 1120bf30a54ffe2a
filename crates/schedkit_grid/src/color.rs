//! Subject code -> palette color assignment.

use indexmap::IndexMap;

use crate::spec::ScheduleError;

/// First-seen-first-assigned palette lookup for one rendering pass.
#[derive(Debug, Clone)]
pub struct ColorAssigner {
    l_palette: Vec<String>,
    dict_color_by_code: IndexMap<String, usize>,
}

impl ColorAssigner {
    /// Create an assigner over an ordered, non-empty palette.
    pub fn new(l_palette: Vec<String>) -> Result<Self, ScheduleError> {
        if l_palette.is_empty() {
            return Err(ScheduleError::Configuration(
                "Color palette must contain at least one color.".to_string(),
            ));
        }
        Ok(Self {
            l_palette,
            dict_color_by_code: IndexMap::new(),
        })
    }

    /// Color of `code`, assigning the next unused palette entry on first sight.
    ///
    /// Fails with [`ScheduleError::Configuration`] once the palette is used up;
    /// colors are never reused for a different code.
    pub fn derive_color(&mut self, code: &str) -> Result<String, ScheduleError> {
        if let Some(&n_idx) = self.dict_color_by_code.get(code) {
            return Ok(self.l_palette[n_idx].clone());
        }

        let n_idx = self.dict_color_by_code.len();
        let Some(c_color) = self.l_palette.get(n_idx) else {
            return Err(ScheduleError::Configuration(format!(
                "Color palette exhausted after {} subject codes; no color left for {code:?}.",
                self.l_palette.len()
            )));
        };
        self.dict_color_by_code.insert(code.to_string(), n_idx);
        Ok(c_color.clone())
    }

    /// Forget all assignments.
    pub fn reset(&mut self) {
        self.dict_color_by_code.clear();
    }

    /// Number of codes assigned so far.
    pub fn n_assigned(&self) -> usize {
        self.dict_color_by_code.len()
    }
}
