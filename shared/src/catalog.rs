//! Fixed word vocabularies, one per category

use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub words: &'static [&'static str],
}

pub static CATEGORIES: [Category; 3] = [
    Category {
        name: "Paises",
        words: &[
            "ECUADOR", "COLOMBIA", "ARGENTINA", "JAPON", "ITALIA", "CANADA", "EGIPTO", "SUECIA",
        ],
    },
    Category {
        name: "Animales",
        words: &[
            "TIGRILLO", "CONDOR", "JAGUAR", "BALLENA", "TUCAN", "IGUANA", "DELFIN", "ARMADILLO",
        ],
    },
    Category {
        name: "Cultura Pop",
        words: &[
            "MATRIX", "AVATAR", "MARVEL", "PIXAR", "NINTENDO", "STARWARS", "POKEMON", "ZELDA",
        ],
    },
];

pub fn find_category(name: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.name == name)
}

pub fn choose_category<R: Rng + ?Sized>(rng: &mut R) -> &'static Category {
    &CATEGORIES[rng.gen_range(0..CATEGORIES.len())]
}

impl Category {
    /// Uniform random subset of at most `count` words.
    pub fn choose_words<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<String> {
        self.words
            .choose_multiple(rng, count)
            .map(|w| w.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_vocabularies_are_clean() {
        for category in &CATEGORIES {
            let unique: HashSet<_> = category.words.iter().collect();
            assert_eq!(unique.len(), category.words.len(), "{}", category.name);
            assert!(category
                .words
                .iter()
                .all(|w| !w.is_empty() && w.chars().all(|c| c.is_ascii_uppercase())));
        }
    }

    #[test]
    fn test_choose_words_distinct_and_bounded() {
        let mut rng = StdRng::seed_from_u64(2);
        let animales = find_category("Animales").unwrap();

        let six = animales.choose_words(6, &mut rng);
        assert_eq!(six.len(), 6);
        assert_eq!(six.iter().collect::<HashSet<_>>().len(), 6);
        assert!(six.iter().all(|w| animales.words.contains(&w.as_str())));

        let clamped = animales.choose_words(20, &mut rng);
        assert_eq!(clamped.len(), animales.words.len());
    }

    #[test]
    fn test_choose_category_reaches_every_category() {
        let mut rng = StdRng::seed_from_u64(8);
        let seen: HashSet<&str> = (0..100).map(|_| choose_category(&mut rng).name).collect();
        assert_eq!(seen.len(), CATEGORIES.len());
    }

    #[test]
    fn test_find_category_unknown() {
        assert!(find_category("Planetas").is_none());
    }
}
