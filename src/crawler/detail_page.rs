//! Record extraction from listing detail pages
//!
//! A detail page carries the headline prices, the community and district
//! links, and two label/value attribute lists ("基本属性" and "交易属性").
//! Each lookup is optional: whatever the page does not provide stays empty in
//! the resulting [`Record`].

use crate::config::{compile_selector, SelectorConfig};
use crate::crawler::document::Document;
use crate::record::{Field, Record};
use crate::ConfigError;
use scraper::Selector;

/// Unit appended to the total price (ten thousand yuan)
pub const TOTAL_PRICE_UNIT: &str = "万";

/// Compiled selectors for the detail page layout
pub struct DetailPageExtractor {
    total_price: Selector,
    unit_price: Selector,
    community_section: Selector,
    community_name: Selector,
    area_section: Selector,
    area_link: Selector,
    attribute_sections: Selector,
    attribute_item: Selector,
}

impl DetailPageExtractor {
    pub fn new(selectors: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            total_price: compile_selector(&selectors.total_price)?,
            unit_price: compile_selector(&selectors.unit_price)?,
            community_section: compile_selector(&selectors.community_section)?,
            community_name: compile_selector(&selectors.community_name)?,
            area_section: compile_selector(&selectors.area_section)?,
            area_link: compile_selector("a")?,
            attribute_sections: compile_selector(&selectors.attribute_sections)?,
            attribute_item: compile_selector(&selectors.attribute_item)?,
        })
    }

    /// Extracts the 25-field record of a detail page
    ///
    /// # Rules
    ///
    /// 1. Total price: headline value plus [`TOTAL_PRICE_UNIT`]
    /// 2. Unit price: per-square-metre value, as shown
    /// 3. Community name: only when the community section exists
    /// 4. District: first two anchors of the area section, concatenated
    /// 5. Attribute lists: each item's first text fragment is the label, the
    ///    remaining fragments joined form the value; unknown labels are ignored
    pub fn extract_record(&self, document: &Document) -> Record {
        let mut record = Record::new();

        if let Some(total) = document.select_one(&self.total_price) {
            record.set(
                Field::TotalPrice,
                format!("{}{}", Document::text(total), TOTAL_PRICE_UNIT),
            );
        }

        if let Some(unit) = document.select_one(&self.unit_price) {
            record.set(Field::UnitPrice, Document::text(unit));
        }

        self.extract_community(document, &mut record);
        self.extract_district(document, &mut record);
        self.extract_attributes(document, &mut record);

        record
    }

    fn extract_community(&self, document: &Document, record: &mut Record) {
        if document.select_one(&self.community_section).is_none() {
            return;
        }

        match document.select_one(&self.community_name) {
            Some(name) => record.set(Field::CommunityName, Document::text(name)),
            None => tracing::debug!("Community section present without a name anchor"),
        }
    }

    fn extract_district(&self, document: &Document, record: &mut Record) {
        let Some(area) = document.select_one(&self.area_section) else {
            return;
        };

        let links = Document::select_within(area, &self.area_link);
        if let [district, sub_area, ..] = links.as_slice() {
            record.set(
                Field::District,
                format!("{}{}", Document::text(*district), Document::text(*sub_area)),
            );
        }
    }

    fn extract_attributes(&self, document: &Document, record: &mut Record) {
        for section in document.select(&self.attribute_sections) {
            for item in Document::select_within(section, &self.attribute_item) {
                let parts = Document::stripped_strings(item);
                let [label, rest @ ..] = parts.as_slice() else {
                    continue;
                };
                if rest.is_empty() {
                    continue;
                }

                if !record.set_by_label(label, rest.concat()) {
                    tracing::trace!("Ignoring unknown attribute '{}'", label);
                }
            }
        }
    }
}
