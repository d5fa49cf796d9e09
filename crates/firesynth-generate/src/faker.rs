//! Free-text fields backed by `fake`, drawing from the run's random source.

use fake::Fake;
use fake::faker::address::en::{BuildingNumber, CityName, PostCode, StateAbbr, StreetName};
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;

use crate::random::RandomSource;

/// en-US text generator.
///
/// Each method performs its draws immediately, so call order is part of the
/// reproducibility contract just like numeric draws.
pub struct TextFaker;

impl TextFaker {
    pub fn city(rng: &mut RandomSource) -> String {
        CityName().fake_with_rng(rng.rng_mut())
    }

    pub fn street_name(rng: &mut RandomSource) -> String {
        StreetName().fake_with_rng(rng.rng_mut())
    }

    /// Building number followed by a street name.
    pub fn street_address(rng: &mut RandomSource) -> String {
        let number: String = BuildingNumber().fake_with_rng(rng.rng_mut());
        let street: String = StreetName().fake_with_rng(rng.rng_mut());
        format!("{number} {street}")
    }

    pub fn state_abbr(rng: &mut RandomSource) -> String {
        StateAbbr().fake_with_rng(rng.rng_mut())
    }

    pub fn postcode(rng: &mut RandomSource) -> String {
        PostCode().fake_with_rng(rng.rng_mut())
    }

    pub fn phone(rng: &mut RandomSource) -> String {
        PhoneNumber().fake_with_rng(rng.rng_mut())
    }

    pub fn person_name(rng: &mut RandomSource) -> String {
        Name().fake_with_rng(rng.rng_mut())
    }

    pub fn sentence(rng: &mut RandomSource) -> String {
        Sentence(4..10).fake_with_rng(rng.rng_mut())
    }

    /// Three-sentence paragraph.
    pub fn paragraph(rng: &mut RandomSource) -> String {
        Paragraph(3..4).fake_with_rng(rng.rng_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_reproducible_under_one_seed() {
        let mut a = RandomSource::new(Some(99));
        let mut b = RandomSource::new(Some(99));
        assert_eq!(TextFaker::street_address(&mut a), TextFaker::street_address(&mut b));
        assert_eq!(TextFaker::person_name(&mut a), TextFaker::person_name(&mut b));
        assert_eq!(TextFaker::paragraph(&mut a), TextFaker::paragraph(&mut b));
    }

    #[test]
    fn fields_are_not_empty() {
        let mut rng = RandomSource::new(Some(4));
        assert!(!TextFaker::city(&mut rng).is_empty());
        assert_eq!(TextFaker::state_abbr(&mut rng).len(), 2);
        assert!(!TextFaker::postcode(&mut rng).is_empty());
        assert!(!TextFaker::phone(&mut rng).is_empty());
        assert!(!TextFaker::sentence(&mut rng).is_empty());
    }
}
