use rs_lyrics_core::render::{render_line, render_song};
use rs_lyrics_core::{Corpus, GenerationConfig, LyricsModels, RhymeLibrary, RhymeScheme, Sentinels, StanzaComposer};

const LYRICS: &str = "\
[Verse 1]
I walk along the river in the night
The city sleeps but I am still awake
I hold your hand and everything is right
I give you all the love that I can make
[Chorus]
Stay with me tonight, stay with me tonight
We can dance until the morning light
Don't you let me go, hold on tight
Everything will be alright
I remember when the summer was a dream
Nothing ever was the way that it would seem
We were young and we were running in the rain
Now I only want to see you once again
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=debug shows every backoff and rhyme retry
    env_logger::init();

    // Bracketed annotations are removed, punctuation stripped and words lowercased
    let corpus = Corpus::from_text(LYRICS);
    println!("{} lines, {} distinct words", corpus.len(), corpus.vocabulary_size());

    // Forward and reverse trigram/bigram/unigram chains
    let models = LyricsModels::train(&corpus, Sentinels::default())?;

    // A rhyme library would usually be loaded from a text file with RhymeLibrary::load
    let mut rhymes = RhymeLibrary::default();
    rhymes.add_group(&["night", "right", "light", "tight", "alright", "tonight"]);
    rhymes.add_group(&["awake", "make"]);
    rhymes.add_group(&["dream", "seem"]);
    rhymes.add_group(&["rain", "again"]);

    let mut config = GenerationConfig::default();

    // Fixed seed: the same song on every run
    config.seed = Some(42);

    // Target number of words per line
    config.set_desired_length(7)?;

    // Invalid line lengths
    match config.set_desired_length(0) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("{}", e),
    }

    // Spread of the length check (must be finite and > 0)
    config.set_length_stddev(1.5)?;
    match config.set_length_stddev(-1.0) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("{}", e),
    }

    let mut rng = config.make_rng();
    let composer = StanzaComposer::new(&models, &rhymes, &config);

    // A single stanza over a custom scheme
    let scheme: RhymeScheme = "ABBA".parse()?;
    println!("\n[{}]", scheme);
    for line in composer.compose(&scheme, &mut rng)? {
        println!("{}", render_line(&line));
    }

    // Verse, chorus, verse, chorus
    let song = composer.compose_song(&RhymeScheme::abab(), &RhymeScheme::aabb(), &mut rng)?;
    println!("\n{}", render_song(&song));

    Ok(())
}
