use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::Deserialize;
use serde_json::from_str;
use std::error::Error;

static PASSAGE_DIR: Dir = include_dir!("src/passages");

/// Built-in passage sets a session can draw from
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum PassageSet {
    Quotes,
    Programming,
}

#[allow(dead_code)]
#[derive(Deserialize, Clone, Debug)]
pub struct Corpus {
    pub name: String,
    pub passages: Vec<String>,
}

impl Corpus {
    pub fn new(set: PassageSet) -> Self {
        read_corpus_from_file(format!("{}.json", set.to_string().to_lowercase())).unwrap()
    }

    /// Picks one passage at random for a new session
    pub fn pick(&self) -> String {
        self.passages
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_default()
    }
}

fn read_corpus_from_file(file_name: String) -> Result<Corpus, Box<dyn Error>> {
    let file = PASSAGE_DIR
        .get_file(file_name)
        .expect("Passage file not found");

    let file_as_str = file
        .contents_utf8()
        .expect("Unable to interpret file as a string");

    let corpus = from_str(file_as_str).expect("Unable to deserialize passage json");

    Ok(corpus)
}
