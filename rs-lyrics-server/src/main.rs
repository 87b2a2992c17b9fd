use std::env;
use std::path::PathBuf;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, put, web};
use log::{info, warn};
use serde::Deserialize;

use rs_lyrics_core::io::{list_dirs, normalize_folder};
use rs_lyrics_core::model::line_generator::LineGenerator;
use rs_lyrics_core::render::{render_line, render_song};
use rs_lyrics_core::{
	Corpus, GenerationConfig, LyricsError, LyricsModels, RhymeLibrary, RhymeScheme, Sentinels, StanzaComposer,
};

/// Query parameters of the `/v1/line` endpoint.
#[derive(Deserialize)]
struct LineParams {
	length: Option<usize>,
	seed: Option<u64>,
}

/// Query parameters of the `/v1/song` endpoint.
#[derive(Deserialize)]
struct SongParams {
	verse_scheme: Option<String>,
	chorus_scheme: Option<String>,
	length: Option<usize>,
	seed: Option<u64>,
}

#[derive(Deserialize)]
struct CorpusQuery {
	name: Option<String>,
}

/// A trained corpus with its rhyme library.
struct LoadedCorpus {
	name: String,
	models: LyricsModels,
	rhymes: RhymeLibrary,
}

struct SharedData {
	data_dir: PathBuf,
	loaded: Option<LoadedCorpus>,
}

impl SharedData {
	fn lyrics_dir(&self) -> PathBuf {
		self.data_dir.join("lyrics")
	}

	fn rhymes_path(&self, name: &str) -> PathBuf {
		self.data_dir.join("rhymes").join(format!("{}.txt", name))
	}
}

/// Builds a generation config from optional query values.
///
/// # Errors
/// Returns `InvalidConfig` on a zero or oversized length.
fn make_config(length: Option<usize>, seed: Option<u64>) -> Result<GenerationConfig, LyricsError> {
	let mut config = GenerationConfig::default();
	if let Some(length) = length {
		config.set_desired_length(length)?;
	}
	config.seed = seed;
	Ok(config)
}

/// Maps a generation error to its HTTP response.
fn error_response(e: LyricsError) -> HttpResponse {
	match e {
		LyricsError::InvalidScheme(_) | LyricsError::InvalidConfig(_) => HttpResponse::BadRequest().body(e.to_string()),
		_ => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

/// HTTP GET endpoint `/v1/corpora`
///
/// Lists the corpus directories available under `<data>/lyrics/`.
#[get("/v1/corpora")]
async fn get_corpora(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let lyrics_dir = match data.lock() {
		Ok(shared_data) => shared_data.lyrics_dir(),
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	match list_dirs(&lyrics_dir) {
		Ok(dirs) => HttpResponse::Ok().body(dirs.join("\n")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora"),
	}
}

#[get("/v1/loaded_corpus")]
async fn get_loaded_corpus(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let name = shared_data.loaded.as_ref().map(|loaded| loaded.name.clone()).unwrap_or_default();
	HttpResponse::Ok().body(name)
}

/// HTTP PUT endpoint `/v1/load_corpus`
///
/// Loads `<data>/lyrics/<name>/` and `<data>/rhymes/<name>.txt`, trains the
/// models and replaces the loaded corpus. A missing rhyme file leaves the
/// corpus usable with an empty library.
#[put("/v1/load_corpus")]
async fn put_corpus(data: web::Data<Mutex<SharedData>>, query: web::Query<CorpusQuery>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let name = match &query.name {
		Some(s) if !s.trim().is_empty() => s.trim().to_owned(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};
	if name.contains(['/', '\\']) || name.starts_with('.') {
		return HttpResponse::BadRequest().body("Invalid corpus name");
	}

	let corpus = match Corpus::load_dir(shared_data.lyrics_dir().join(&name)) {
		Ok(corpus) => corpus,
		Err(e) => return HttpResponse::InternalServerError().body(format!("Failed to load corpus: {e}")),
	};
	let models = match LyricsModels::train(&corpus, Sentinels::default()) {
		Ok(models) => models,
		Err(e) => return HttpResponse::InternalServerError().body(format!("Failed to train models: {e}")),
	};

	let rhymes_path = shared_data.rhymes_path(&name);
	let rhymes = if rhymes_path.exists() {
		match RhymeLibrary::load(&rhymes_path) {
			Ok(rhymes) => rhymes,
			Err(e) => return HttpResponse::InternalServerError().body(format!("Failed to load rhymes: {e}")),
		}
	} else {
		warn!("no rhyme library at {}, rhymes will degrade", rhymes_path.display());
		RhymeLibrary::default()
	};

	info!("corpus '{}' loaded", name);
	shared_data.loaded = Some(LoadedCorpus { name, models, rhymes });
	HttpResponse::Ok().body("Corpus loaded successfully")
}

/// HTTP GET endpoint `/v1/line`
///
/// Generates one forward line.
#[get("/v1/line")]
async fn get_line(data: web::Data<Mutex<SharedData>>, query: web::Query<LineParams>) -> impl Responder {
	let config = match make_config(query.length, query.seed) {
		Ok(config) => config,
		Err(e) => return error_response(e),
	};

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let Some(loaded) = shared_data.loaded.as_ref() else {
		return HttpResponse::Conflict().body("No corpus loaded");
	};

	let mut rng = config.make_rng();
	let lines = LineGenerator::new(&loaded.models, &config);
	let line = match lines.generate(config.desired_length, &mut rng) {
		Err(e) if e.is_recoverable() => {
			warn!("{}, accepting a degraded line", e);
			lines.generate_degraded(config.desired_length, &mut rng)
		}
		other => other,
	};
	match line {
		Ok(line) => HttpResponse::Ok().body(render_line(&line)),
		Err(e) => error_response(e),
	}
}

/// HTTP GET endpoint `/v1/song`
///
/// Generates a song. Verses default to `ABAB`, the chorus to `AABB`.
#[get("/v1/song")]
async fn get_song(data: web::Data<Mutex<SharedData>>, query: web::Query<SongParams>) -> impl Responder {
	let parse_scheme = |scheme: &Option<String>, default: RhymeScheme| match scheme {
		Some(scheme) => RhymeScheme::parse(scheme),
		None => Ok(default),
	};
	let verse_scheme = match parse_scheme(&query.verse_scheme, RhymeScheme::abab()) {
		Ok(scheme) => scheme,
		Err(e) => return error_response(e),
	};
	let chorus_scheme = match parse_scheme(&query.chorus_scheme, RhymeScheme::aabb()) {
		Ok(scheme) => scheme,
		Err(e) => return error_response(e),
	};
	let config = match make_config(query.length, query.seed) {
		Ok(config) => config,
		Err(e) => return error_response(e),
	};

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let Some(loaded) = shared_data.loaded.as_ref() else {
		return HttpResponse::Conflict().body("No corpus loaded");
	};

	let mut rng = config.make_rng();
	let composer = StanzaComposer::new(&loaded.models, &loaded.rhymes, &config);
	match composer.compose_song(&verse_scheme, &chorus_scheme, &mut rng) {
		Ok(song) => HttpResponse::Ok().body(render_song(&song)),
		Err(e) => error_response(e),
	}
}

/// Main entry point for the server.
///
/// Starts an Actix-web HTTP server with no corpus loaded; clients pick one
/// through `/v1/load_corpus`.
///
/// # Notes
/// - `LYRICS_BIND` sets the bind address (default `127.0.0.1:5000`).
/// - `LYRICS_DATA_DIR` sets the data directory (default `./data`), which holds
///   `lyrics/<name>/` corpora and `rhymes/<name>.txt` libraries.
/// - `RUST_LOG` controls log verbosity.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let bind = env::var("LYRICS_BIND").unwrap_or_else(|_| "127.0.0.1:5000".to_owned());
	let data_dir = normalize_folder(&env::var("LYRICS_DATA_DIR").unwrap_or_else(|_| "./data".to_owned()));
	info!("serving {} on {}", data_dir.display(), bind);

	let shared_data = SharedData { data_dir, loaded: None };
	let shared_model = web::Data::new(Mutex::new(shared_data));

	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_model.clone())
			.service(get_corpora)
			.service(get_loaded_corpus)
			.service(put_corpus)
			.service(get_line)
			.service(get_song)
	})
	.bind(bind)?
	.run()
	.await
}
