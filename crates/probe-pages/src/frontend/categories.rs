//! Category list shown on the public site.

use crate::frontend::Search;
use amo_probe::{locators, Page, ProbeResult, Region, Scope};

/// The category block
#[derive(Debug, Clone)]
pub struct Categories {
    region: Region,
}

locators! {
    Categories {
        ROOT = class_name("Categories"),
        ITEMS = class_name("Categories-item"),
    }
}

impl Categories {
    /// Find the category block inside `parent`
    pub fn locate<S: Scope + ?Sized>(parent: &S) -> ProbeResult<Self> {
        Ok(Self {
            region: Region::locate(parent, &Self::ROOT, "Categories")?,
        })
    }

    /// The block's region
    #[must_use]
    pub const fn region(&self) -> &Region {
        &self.region
    }

    /// Block until at least one category is visible
    pub fn wait_for_categories_to_load(self) -> ProbeResult<Self> {
        let _ = self.region.wait_for_any_visible(&Self::ITEMS)?;
        Ok(self)
    }

    /// Categories in display order
    pub fn category_list(&self) -> ProbeResult<Vec<CategoryItem>> {
        Ok(self
            .region
            .find_all(&Self::ITEMS)?
            .into_iter()
            .map(|root| CategoryItem {
                region: Region::from_element(root, "CategoryItem"),
            })
            .collect())
    }
}

/// One category link
#[derive(Debug, Clone)]
pub struct CategoryItem {
    region: Region,
}

locators! {
    CategoryItem {
        NAME = class_name("Categories-link"),
    }
}

impl CategoryItem {
    /// Category name
    pub fn name(&self) -> ProbeResult<String> {
        self.region.find(&Self::NAME)?.text()
    }

    /// Open the category's search results
    pub fn click(&self) -> ProbeResult<Search> {
        self.region.check_fresh(self.region.root().locator())?;
        self.region.root().click_and_navigate()?;
        Search::wait_for_page(self.region.session())
    }
}
