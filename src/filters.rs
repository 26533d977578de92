//! Category filters and the places-service category vocabulary

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Hotels,
    Restaurants,
    Landmarks,
}

impl Category {
    /// Panel order; also the order categories are sent to the service
    pub const ALL: [Category; 3] = [Category::Hotels, Category::Restaurants, Category::Landmarks];

    /// Term in the places-service taxonomy
    pub fn service_term(&self) -> &'static str {
        match self {
            Category::Hotels => "accommodation.hotel",
            Category::Restaurants => "catering.restaurant",
            Category::Landmarks => "tourism.attraction",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Hotels => "Hotels",
            Category::Restaurants => "Restaurants",
            Category::Landmarks => "Landmarks",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Category::Hotels => "🏨",
            Category::Restaurants => "🍽️",
            Category::Landmarks => "🏛️",
        }
    }
}

/// Which categories the next search should request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchFilters {
    pub hotels: bool,
    pub restaurants: bool,
    pub landmarks: bool,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            hotels: true,
            restaurants: true,
            landmarks: true,
        }
    }
}

impl SearchFilters {
    pub fn none() -> Self {
        Self {
            hotels: false,
            restaurants: false,
            landmarks: false,
        }
    }

    pub fn is_enabled(&self, category: Category) -> bool {
        match category {
            Category::Hotels => self.hotels,
            Category::Restaurants => self.restaurants,
            Category::Landmarks => self.landmarks,
        }
    }

    /// Flip a single flag, leaving the others alone
    pub fn toggle(&mut self, category: Category) {
        let flag = match category {
            Category::Hotels => &mut self.hotels,
            Category::Restaurants => &mut self.restaurants,
            Category::Landmarks => &mut self.landmarks,
        };
        *flag = !*flag;
    }

    pub fn enabled(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.is_enabled(*c))
            .collect()
    }

    /// Enabled categories mapped to service terms, in panel order
    pub fn service_terms(&self) -> Vec<String> {
        self.enabled()
            .iter()
            .map(|c| c.service_term().to_string())
            .collect()
    }
}
