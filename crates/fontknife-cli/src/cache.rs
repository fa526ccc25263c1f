//! Content-addressed cache of parsed fonts.
//!
//! Parsing outline fonts and large bitmap fonts is the slow part of every
//! command, so parsed [`RasterFont`]s are stored keyed by:
//! - BLAKE3 hash of the source bytes
//! - Source format
//! - Load options (point size, glyph sequence, sheet grid)
//! - fontknife version
//!
//! Cache entries are stored in an XDG-compatible directory structure.

use anyhow::{Context, Result};
use fontknife_font::RasterFont;
use fontknife_formats::{LoadOptions, SourceFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

const MANIFEST_FILE: &str = "manifest.json";
const FONT_FILE: &str = "font.json";

/// Cache key components for deterministic cache lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheKey {
    /// BLAKE3 hash of the source font bytes
    pub data_hash: String,
    /// Source format name
    pub format: String,
    /// Requested point size
    pub font_size_points: u32,
    /// Requested glyph sequence, if any
    pub glyph_sequence: Option<Vec<String>>,
    /// Sprite-sheet grid, as JSON
    pub grid: String,
    /// fontknife version that parsed the font
    pub version: String,
}

impl CacheKey {
    /// Create a new cache key
    pub fn new(data: &[u8], format: SourceFormat, options: &LoadOptions) -> Result<Self> {
        let grid =
            serde_json::to_string(&options.grid).context("Failed to serialize sheet grid")?;
        Ok(Self {
            data_hash: blake3::hash(data).to_hex().to_string(),
            format: format.name().to_string(),
            font_size_points: options.font_size_points,
            glyph_sequence: options.glyph_sequence.clone(),
            grid,
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    /// Compute the cache entry hash (deterministic cache directory name)
    pub fn compute_hash(&self) -> String {
        let glyphs = self
            .glyph_sequence
            .as_ref()
            .map(|g| g.join("\u{1f}"))
            .unwrap_or_default();
        let canonical = format!(
            "data:{},format:{},points:{},glyphs:{}:{},grid:{},version:{}",
            self.data_hash,
            self.format,
            self.font_size_points,
            self.glyph_sequence.is_some(),
            glyphs,
            self.grid,
            self.version
        );
        blake3::hash(canonical.as_bytes()).to_hex().to_string()
    }
}

/// Cache manifest stored alongside the cached font
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheManifest {
    /// Cache key components
    pub key: CacheKey,
    /// Where the font was first loaded from
    pub origin: String,
    /// Timestamp when this entry was created
    pub created_at: String,
    /// Number of glyphs in the cached font
    pub glyph_count: usize,
}

/// Cache manager for reading/writing parsed fonts
pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    /// Create a cache manager rooted at `dir`, or the default XDG cache directory
    pub fn new(dir: Option<PathBuf>) -> Result<Self> {
        let cache_dir = match dir {
            Some(dir) => dir,
            None => Self::default_cache_dir().context("Failed to determine cache directory")?,
        };
        Ok(Self { cache_dir })
    }

    /// Get the default cache directory (XDG-compatible)
    pub fn default_cache_dir() -> Option<PathBuf> {
        dirs::cache_dir().map(|d| d.join("fontknife").join("fonts"))
    }

    /// Get the path to a cache entry directory
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        let hash = key.compute_hash();
        self.cache_dir.join(format!("{}.cache", hash))
    }

    /// Check if a cache entry exists
    pub fn has_entry(&self, key: &CacheKey) -> bool {
        self.entry_path(key).join(MANIFEST_FILE).exists()
    }

    /// Retrieve a cached font (returns None if cache miss)
    ///
    /// The returned font's path points at the cached copy.
    pub fn get(&self, key: &CacheKey) -> Result<Option<RasterFont>> {
        if !self.has_entry(key) {
            return Ok(None);
        }
        let entry_path = self.entry_path(key);

        let manifest = Self::read_manifest(&entry_path)?;
        if manifest.key != *key {
            debug!(entry = %entry_path.display(), "cache key mismatch");
            return Ok(None);
        }

        let font_path = entry_path.join(FONT_FILE);
        let font_json = fs::read_to_string(&font_path)
            .with_context(|| format!("Failed to read cached font: {}", font_path.display()))?;
        let font: RasterFont =
            serde_json::from_str(&font_json).context("Failed to parse cached font")?;

        debug!(entry = %entry_path.display(), glyphs = font.len(), "cache hit");
        Ok(Some(font.with_path(font_path.display().to_string())))
    }

    /// Store a parsed font in the cache
    pub fn put(&self, key: &CacheKey, font: &RasterFont, origin: &str) -> Result<()> {
        let entry_path = self.entry_path(key);

        fs::create_dir_all(&entry_path).with_context(|| {
            format!(
                "Failed to create cache entry directory: {}",
                entry_path.display()
            )
        })?;

        let font_json = serde_json::to_string(font).context("Failed to serialize font")?;
        fs::write(entry_path.join(FONT_FILE), font_json).context("Failed to write cached font")?;

        // Manifest goes last: its presence marks a complete entry
        let manifest = CacheManifest {
            key: key.clone(),
            origin: origin.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            glyph_count: font.len(),
        };
        let manifest_json = serde_json::to_string_pretty(&manifest)
            .context("Failed to serialize cache manifest")?;
        fs::write(entry_path.join(MANIFEST_FILE), manifest_json)
            .context("Failed to write cache manifest")?;

        debug!(entry = %entry_path.display(), "cached font");
        Ok(())
    }

    /// Remove every cached font, returning how many were removed
    pub fn clear(&self) -> Result<u64> {
        let mut removed = 0u64;
        for font in self.cached_fonts()? {
            fs::remove_dir_all(&font.entry).with_context(|| {
                format!("Failed to remove cached font: {}", font.entry.display())
            })?;
            removed += 1;
        }
        Ok(removed)
    }

    /// Summarize the cached fonts
    pub fn stats(&self) -> Result<CacheStats> {
        let fonts = self.cached_fonts()?;
        Ok(CacheStats {
            cache_dir: self.cache_dir.clone(),
            font_count: fonts.len() as u64,
            glyph_count: fonts.iter().map(|f| f.glyph_count).sum(),
            total_size_bytes: fonts.iter().map(|f| f.size_bytes).sum(),
        })
    }

    fn read_manifest(entry: &Path) -> Result<CacheManifest> {
        let manifest_json = fs::read_to_string(entry.join(MANIFEST_FILE))
            .context("Failed to read cache manifest")?;
        serde_json::from_str(&manifest_json).context("Failed to parse cache manifest")
    }

    /// Entry directories holding a `font.json`, including ones whose
    /// manifest was never written
    fn cached_fonts(&self) -> Result<Vec<CachedFont>> {
        if !self.cache_dir.exists() {
            return Ok(Vec::new());
        }

        let mut fonts = Vec::new();
        let walker = WalkDir::new(&self.cache_dir)
            .min_depth(2)
            .max_depth(2)
            .sort_by_file_name();
        for file in walker {
            let file = file.context("Failed to walk cache directory")?;
            if file.file_name() != FONT_FILE {
                continue;
            }
            let Some(entry) = file.path().parent() else {
                continue;
            };
            if entry.extension().and_then(|s| s.to_str()) != Some("cache") {
                continue;
            }

            let mut size_bytes = file.metadata().context("Failed to stat cached font")?.len();
            let glyph_count = match Self::read_manifest(entry) {
                Ok(manifest) => {
                    size_bytes += fs::metadata(entry.join(MANIFEST_FILE))
                        .map(|m| m.len())
                        .unwrap_or(0);
                    manifest.glyph_count as u64
                }
                Err(e) => {
                    debug!(entry = %entry.display(), error = %e, "cached font without manifest");
                    0
                }
            };
            fonts.push(CachedFont {
                entry: entry.to_path_buf(),
                size_bytes,
                glyph_count,
            });
        }
        Ok(fonts)
    }
}

struct CachedFont {
    entry: PathBuf,
    size_bytes: u64,
    glyph_count: u64,
}

/// Totals over the cached fonts
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub cache_dir: PathBuf,
    pub font_count: u64,
    pub glyph_count: u64,
    /// Bytes used by cached fonts and their manifests
    pub total_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fontknife_font::{BoundingBox, GlyphBitmap};
    use tempfile::TempDir;

    fn test_font() -> RasterFont {
        let bitmap = GlyphBitmap::from_text_rows(&["X.", ".X"], 'X');
        RasterFont::builder()
            .path("font.bdf")
            .glyph("x", bitmap, BoundingBox::new(0, 0, 2, 2))
            .build()
    }

    fn key(data: &[u8]) -> CacheKey {
        CacheKey::new(data, SourceFormat::Bdf, &LoadOptions::default()).unwrap()
    }

    #[test]
    fn test_cache_key_compute_hash() {
        assert_eq!(key(b"font").compute_hash(), key(b"font").compute_hash());
        assert_ne!(key(b"font").compute_hash(), key(b"other").compute_hash());
    }

    #[test]
    fn test_cache_key_includes_options() {
        let base = key(b"font");
        let sized = CacheKey::new(
            b"font",
            SourceFormat::Bdf,
            &LoadOptions::default().with_font_size_points(12),
        )
        .unwrap();
        let glyphs = CacheKey::new(
            b"font",
            SourceFormat::Bdf,
            &LoadOptions::default().with_glyph_sequence(vec!["a".to_string()]),
        )
        .unwrap();
        let format = CacheKey::new(b"font", SourceFormat::Pcf, &LoadOptions::default()).unwrap();

        assert_ne!(base.compute_hash(), sized.compute_hash());
        assert_ne!(base.compute_hash(), glyphs.compute_hash());
        assert_ne!(base.compute_hash(), format.compute_hash());
    }

    #[test]
    fn test_cache_put_and_get() {
        let temp = TempDir::new().unwrap();
        let manager = CacheManager::new(Some(temp.path().to_path_buf())).unwrap();
        let key = key(b"font");
        let font = test_font();

        assert!(!manager.has_entry(&key));
        assert!(manager.get(&key).unwrap().is_none());

        manager.put(&key, &font, "font.bdf").unwrap();
        assert!(manager.has_entry(&key));

        let cached = manager.get(&key).unwrap().unwrap();
        assert_eq!(cached.provided_glyphs(), font.provided_glyphs());
        assert_eq!(
            cached.get_glyph("x", true).unwrap(),
            font.get_glyph("x", true).unwrap()
        );
        let path = cached.path().unwrap();
        assert!(path.ends_with("font.json"), "{path}");
    }

    #[test]
    fn test_cache_clear() {
        let temp = TempDir::new().unwrap();
        let manager = CacheManager::new(Some(temp.path().to_path_buf())).unwrap();

        manager.put(&key(b"one"), &test_font(), "one.bdf").unwrap();
        manager.put(&key(b"two"), &test_font(), "two.bdf").unwrap();

        assert_eq!(manager.clear().unwrap(), 2);
        assert!(!manager.has_entry(&key(b"one")));
        assert_eq!(manager.clear().unwrap(), 0);
    }

    #[test]
    fn test_cache_stats() {
        let temp = TempDir::new().unwrap();
        let manager = CacheManager::new(Some(temp.path().join("fonts"))).unwrap();

        let stats = manager.stats().unwrap();
        assert_eq!(stats.font_count, 0);
        assert_eq!(stats.total_size_bytes, 0);

        manager.put(&key(b"font"), &test_font(), "font.bdf").unwrap();
        let stats = manager.stats().unwrap();
        assert_eq!(stats.font_count, 1);
        assert_eq!(stats.glyph_count, 1);
        assert!(stats.total_size_bytes > 0);
        assert_eq!(stats.cache_dir, temp.path().join("fonts"));
    }

    #[test]
    fn test_only_font_entries_are_listed() {
        let temp = TempDir::new().unwrap();
        let manager = CacheManager::new(Some(temp.path().to_path_buf())).unwrap();
        manager.put(&key(b"font"), &test_font(), "font.bdf").unwrap();

        // An interrupted put leaves font.json without a manifest
        let partial = temp.path().join("partial.cache");
        fs::create_dir_all(&partial).unwrap();
        fs::write(partial.join(FONT_FILE), "{}").unwrap();
        // Unrelated directories are left alone
        let stray = temp.path().join("stray.cache");
        fs::create_dir_all(&stray).unwrap();
        fs::write(stray.join("notes.txt"), "keep").unwrap();

        let stats = manager.stats().unwrap();
        assert_eq!(stats.font_count, 2);
        assert_eq!(stats.glyph_count, 1);

        assert_eq!(manager.clear().unwrap(), 2);
        assert!(!partial.exists());
        assert!(stray.join("notes.txt").exists());
    }

    #[test]
    fn test_corrupt_manifest_is_error() {
        let temp = TempDir::new().unwrap();
        let manager = CacheManager::new(Some(temp.path().to_path_buf())).unwrap();
        let key = key(b"font");
        let entry = manager.entry_path(&key);
        fs::create_dir_all(&entry).unwrap();
        fs::write(entry.join(MANIFEST_FILE), "not json").unwrap();

        assert!(manager.get(&key).is_err());
    }
}
