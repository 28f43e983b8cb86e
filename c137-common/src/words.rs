//! Random word and name generators

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Default visitor identity
pub const DEFAULT_IDENTITY: &str = "Rick Sanchez";

const WEIRD_PREFIXES: &[&str] = &[
    "Zorp", "Quib", "Flux", "Blorp", "Snarf", "Wibble", "Zizz", "Plonk", "Fizz", "Bloop", "Zap",
    "Wobble", "Splonk", "Zizzle", "Flibber",
];

const WEIRD_SUFFIXES: &[&str] = &[
    "onium", "tron", "zoid", "blaster", "inator", "otron", "zap", "whizz", "blorp", "snarf",
    "zoid", "tastic", "zle", "onium", "otron",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjectiveType {
    Serious,
    Humorous,
    Celestial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NounType {
    Animal,
    Cat,
    Star,
}

impl AdjectiveType {
    fn words(self) -> &'static [&'static str] {
        match self {
            AdjectiveType::Serious => &["professional", "essential", "fundamental", "critical", "important"],
            AdjectiveType::Humorous => &["silly", "funny", "ridiculous", "absurd", "hilarious"],
            AdjectiveType::Celestial => &["astral", "cosmic", "stellar", "galactic", "lunar"],
        }
    }
}

impl NounType {
    fn words(self) -> &'static [&'static str] {
        match self {
            NounType::Animal => &["elephant", "giraffe", "tiger", "panda", "penguin"],
            NounType::Cat => &["tabby", "siamese", "calico", "maine coon", "persian"],
            NounType::Star => &["sun", "polaris", "sirius", "betelgeuse", "vega"],
        }
    }
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, words: &[&'a str]) -> &'a str {
    // Word lists are non-empty constants
    words.choose(rng).copied().unwrap_or_default()
}

/// Random prefix + suffix, e.g. "Blorptron"
pub fn weird_word<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{}{}", pick(rng, WEIRD_PREFIXES), pick(rng, WEIRD_SUFFIXES))
}

/// `"{adjective} {noun}"` drawn from the chosen categories
pub fn random_combination<R: Rng + ?Sized>(
    rng: &mut R,
    adjective: AdjectiveType,
    noun: NounType,
) -> String {
    format!("{} {}", pick(rng, adjective.words()), pick(rng, noun.words()))
}

/// Text before the first space
pub fn first_name(name: &str) -> &str {
    name.split(' ').next().unwrap_or(name)
}
