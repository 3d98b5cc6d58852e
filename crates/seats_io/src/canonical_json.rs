//! Canonical JSON
//! - Objects: keys sorted lexicographically (byte order)
//! - Arrays: order preserved (callers emit stable orderings)
//! - Output: compact, no trailing newline
//! - File writes go through a temp file in the target directory, fsync, then rename.
//!   If the rename fails the target is written directly and the temp is removed.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::{IoError, IoResult};

/// Canonical bytes of a `serde_json::Value`.
pub fn to_canonical_json_bytes(v: &Value) -> IoResult<Vec<u8>> {
    let mut out = Vec::with_capacity(1024);
    write_canonical_value(v, &mut out)?;
    Ok(out)
}

/// Canonical bytes of any serializable value.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> IoResult<Vec<u8>> {
    let v = serde_json::to_value(value)?;
    to_canonical_json_bytes(&v)
}

/// Write canonical JSON to `path` atomically.
pub fn write_canonical_file(path: &Path, v: &Value) -> IoResult<()> {
    let bytes = to_canonical_json_bytes(v)?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)
        .map_err(|e| IoError::Path(format!("create {}: {e}", parent.display())))?;

    let tmp = make_unique_tmp_path(path);
    {
        let mut tf = OpenOptions::new().write(true).create_new(true).open(&tmp)?;
        tf.write_all(&bytes)?;
        tf.sync_all()?;
    }

    if fs::rename(&tmp, path).is_err() {
        let direct = write_direct(path, &bytes);
        let _ = fs::remove_file(&tmp);
        direct.map_err(|e| IoError::Path(format!("write {}: {e}", path.display())))?;
    }
    let _ = fsync_dir(&parent);
    Ok(())
}

fn write_direct(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut f = OpenOptions::new().write(true).create(true).truncate(true).open(path)?;
    f.write_all(bytes)?;
    f.sync_all()
}

fn write_canonical_value(v: &Value, out: &mut Vec<u8>) -> IoResult<()> {
    match v {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),
        Value::Number(n) => out.extend_from_slice(n.to_string().as_bytes()),
        Value::String(s) => serde_json::to_writer(&mut *out, s)?,
        Value::Array(arr) => {
            out.push(b'[');
            for (i, elem) in arr.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_canonical_value(elem, out)?;
            }
            out.push(b']');
        }
        Value::Object(map) => {
            out.push(b'{');
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
            for (i, (k, val)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                serde_json::to_writer(&mut *out, k)?;
                out.push(b':');
                write_canonical_value(val, out)?;
            }
            out.push(b'}');
        }
    }
    Ok(())
}

/// "<filename>.<pid>.<counter>.tmp" next to `target`.
fn make_unique_tmp_path(target: &Path) -> PathBuf {
    use std::sync::atomic::{AtomicU64, Ordering};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let fname = target.file_name().and_then(|s| s.to_str()).unwrap_or("out");
    target.with_file_name(format!("{fname}.{}.{n}.tmp", std::process::id()))
}

#[cfg(unix)]
fn fsync_dir(dir: &Path) -> io::Result<()> {
    OpenOptions::new().read(true).open(dir)?.sync_all()
}

#[cfg(not(unix))]
#[inline]
fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_sorted_arrays_kept() {
        let v = json!({
            "national": [{"seats": 3, "grouping": "KO"}],
            "failed_regions": [],
            "integrity": {"result_id": "RES:x", "config_sha256": "y"}
        });
        let s = String::from_utf8(to_canonical_json_bytes(&v).unwrap()).unwrap();
        assert_eq!(
            s,
            r#"{"failed_regions":[],"integrity":{"config_sha256":"y","result_id":"RES:x"},"national":[{"grouping":"KO","seats":3}]}"#
        );
        assert!(!s.ends_with('\n'));
    }

    #[test]
    fn strings_are_escaped() {
        let v = json!({"name": "Koalicja \"Obywatelska\"\n"});
        let s = String::from_utf8(to_canonical_json_bytes(&v).unwrap()).unwrap();
        assert_eq!(s, r#"{"name":"Koalicja \"Obywatelska\"\n"}"#);
    }

    #[test]
    fn atomic_write_creates_parents_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out").join("result.json");
        write_canonical_file(&target, &json!({"b": 1, "a": 2})).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), r#"{"a":2,"b":1}"#);

        let leftovers: Vec<_> = fs::read_dir(target.parent().unwrap())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());

        write_canonical_file(&target, &json!({"c": 3})).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), r#"{"c":3}"#);
    }
}
