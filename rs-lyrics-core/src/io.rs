use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
/// - Invalid UTF-8 is replaced rather than rejected (scraped lyrics are messy)
pub fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut bytes = Vec::new();
	File::open(filename)?.read_to_end(&mut bytes)?;
	Ok(String::from_utf8_lossy(&bytes).lines().map(str::to_owned).collect())
}

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `data/rhymes/the_beatles.txt` + `"bin"` → `data/rhymes/the_beatles.bin`
pub fn build_output_path<P: AsRef<Path>>(
	input_path: P,
	output_extension: &str,
) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./data/rhymes/queen.txt"` → `"queen"`
/// - `"queen.txt"` → `"queen"`
pub fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder(input: &str) -> PathBuf {
	if input == "." || input == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(input)
	}
}

/// Lists the files of a directory, optionally only those with `extension`.
///
/// Returns file names only (no paths), sorted.
pub fn list_files<P: AsRef<Path>>(dir: P, extension: Option<&str>) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if !path.is_file() {
			continue;
		}
		if let Some(extension) = extension {
			if path.extension() != Some(std::ffi::OsStr::new(extension)) {
				continue;
			}
		}
		if let Some(name) = path.file_name() {
			files.push(name.to_string_lossy().to_string());
		}
	}

	files.sort();
	Ok(files)
}

/// Lists the sub-directories of a directory, sorted by name.
pub fn list_dirs<P: AsRef<Path>>(dir: P) -> io::Result<Vec<String>> {
	let mut dirs = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_dir() {
			if let Some(name) = path.file_name() {
				dirs.push(name.to_string_lossy().to_string());
			}
		}
	}

	dirs.sort();
	Ok(dirs)
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use std::sync::atomic::{AtomicUsize, Ordering};

	static COUNTER: AtomicUsize = AtomicUsize::new(0);

	/// Creates a fresh, empty directory under the system temp dir.
	pub(crate) fn scratch_dir(tag: &str) -> PathBuf {
		let dir = env::temp_dir().join(format!(
			"rs-lyrics-{}-{}-{}",
			tag,
			std::process::id(),
			COUNTER.fetch_add(1, Ordering::SeqCst)
		));
		let _ = fs::remove_dir_all(&dir);
		fs::create_dir_all(&dir).unwrap();
		dir
	}

	#[test]
	fn output_path_swaps_the_extension() {
		let path = build_output_path("data/rhymes/queen.txt", "bin").unwrap();
		assert_eq!(path, PathBuf::from("data/rhymes/queen.bin"));
		assert_eq!(get_filename("data/rhymes/queen.txt").unwrap(), "queen");
	}

	#[test]
	fn lists_files_and_dirs_sorted() {
		let dir = scratch_dir("io");
		fs::write(dir.join("b.txt"), "b").unwrap();
		fs::write(dir.join("a.txt"), "a").unwrap();
		fs::write(dir.join("c.bin"), "c").unwrap();
		fs::create_dir(dir.join("nested")).unwrap();

		assert_eq!(list_files(&dir, Some("txt")).unwrap(), vec!["a.txt", "b.txt"]);
		assert_eq!(list_files(&dir, None).unwrap(), vec!["a.txt", "b.txt", "c.bin"]);
		assert_eq!(list_dirs(&dir).unwrap(), vec!["nested"]);
		assert_eq!(read_file(dir.join("a.txt")).unwrap(), vec!["a"]);

		fs::remove_dir_all(&dir).unwrap();
	}

	#[test]
	fn normalize_keeps_other_paths() {
		assert_eq!(normalize_folder("data/lyrics"), PathBuf::from("data/lyrics"));
		assert!(normalize_folder(".").is_absolute());
	}
}
