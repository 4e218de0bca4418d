use std::{
    collections::BTreeMap,
    env, fs, io,
    path::{Path, PathBuf},
};

use itertools::Itertools as _;
use path_macro::path;

use crate::error::{AmentError, Result};

pub const AMENT_PREFIX_PATH_ENV: &str = "AMENT_PREFIX_PATH";
pub const RESOURCE_INDEX_SUBFOLDER: &str = "share/ament_index/resource_index";
pub const PACKAGES_RESOURCE_TYPE: &str = "packages";

/// An ordered set of install prefixes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmentIndex {
    prefixes: Vec<PathBuf>,
}

/// Contents of a resource marker file and the prefix that registered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub content: String,
    pub prefix: PathBuf,
}

impl AmentIndex {
    pub fn new<P, I>(prefixes: I) -> Self
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(|dir| dir.as_ref().to_owned())
                .collect(),
        }
    }

    /// Reads the prefixes from `$AMENT_PREFIX_PATH`.
    pub fn from_env() -> Result<Self> {
        let value = env::var_os(AMENT_PREFIX_PATH_ENV).ok_or(AmentError::PrefixPathUnset)?;
        Ok(Self::new(env::split_paths(&value).filter(|dir| {
            !dir.as_os_str().is_empty()
        })))
    }

    /// Parses a `:`-separated prefix list. Empty segments are skipped.
    pub fn from_prefix_path(value: &str) -> Self {
        Self::new(value.split(':').filter(|segment| !segment.is_empty()))
    }

    pub fn with_prefix<P>(mut self, dir: P) -> Self
    where
        P: AsRef<Path>,
    {
        self.prefixes.push(dir.as_ref().to_owned());
        self
    }

    pub fn with_prefixes<P, I>(mut self, dirs: I) -> Self
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        self.prefixes
            .extend(dirs.into_iter().map(|dir| dir.as_ref().to_owned()));
        self
    }

    pub fn prefixes(&self) -> &[PathBuf] {
        &self.prefixes
    }

    pub fn package_prefix(&self, package: &str) -> Result<&Path> {
        validate_package_name(package)?;

        self.find_marker(PACKAGES_RESOURCE_TYPE, package)
            .map(|(prefix, _)| prefix)
            .ok_or_else(|| AmentError::PackageNotFound(package.to_string()))
    }

    /// `<prefix>/share/<package>` of the first prefix registering `package`.
    pub fn package_share_directory(&self, package: &str) -> Result<PathBuf> {
        let prefix = self.package_prefix(package)?;
        let share_dir = path!(prefix / "share" / package);
        log::debug!(
            "resolved share directory of '{}' to '{}'",
            package,
            share_dir.display()
        );
        Ok(share_dir)
    }

    /// `<prefix>/lib/<package>`, where `ros2 run` looks for executables.
    pub fn package_libexec_directory(&self, package: &str) -> Result<PathBuf> {
        let prefix = self.package_prefix(package)?;
        Ok(path!(prefix / "lib" / package))
    }

    pub fn resource(&self, resource_type: &str, name: &str) -> Result<Resource> {
        let (prefix, marker) = self.find_marker(resource_type, name).ok_or_else(|| {
            AmentError::ResourceNotFound {
                resource_type: resource_type.to_string(),
                name: name.to_string(),
            }
        })?;

        let content = fs::read_to_string(&marker).map_err(|source| AmentError::Io {
            path: marker.clone(),
            source,
        })?;

        Ok(Resource {
            content,
            prefix: prefix.to_owned(),
        })
    }

    /// All resources of one type, mapped to the prefix that registered them
    /// first.
    pub fn resources(&self, resource_type: &str) -> Result<BTreeMap<String, PathBuf>> {
        let mut resources = BTreeMap::new();

        for prefix in &self.prefixes {
            let dir = path!(prefix / RESOURCE_INDEX_SUBFOLDER / resource_type);
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                Err(source) => return Err(AmentError::Io { path: dir, source }),
            };

            let names: Vec<_> = entries
                .map(|entry| -> Result<_> {
                    let entry = entry.map_err(|source| AmentError::Io {
                        path: dir.clone(),
                        source,
                    })?;
                    let is_file = entry.file_type().map(|ty| ty.is_file()).unwrap_or(false);
                    let name = entry.file_name().to_str().map(str::to_string);
                    Ok(name.filter(|name| is_file && !name.starts_with('.')))
                })
                .try_collect()?;

            for name in names.into_iter().flatten() {
                resources.entry(name).or_insert_with(|| prefix.clone());
            }
        }

        Ok(resources)
    }

    pub fn packages_with_prefixes(&self) -> Result<BTreeMap<String, PathBuf>> {
        self.resources(PACKAGES_RESOURCE_TYPE)
    }

    fn find_marker(&self, resource_type: &str, name: &str) -> Option<(&Path, PathBuf)> {
        self.prefixes.iter().find_map(|prefix| {
            let marker = path!(prefix / RESOURCE_INDEX_SUBFOLDER / resource_type / name);
            marker.is_file().then(|| (prefix.as_path(), marker))
        })
    }
}

fn validate_package_name(package: &str) -> Result<()> {
    if package.is_empty() || package.contains('/') || package.contains('\\') {
        return Err(AmentError::InvalidPackageName(package.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_path_skips_empty_segments() {
        let index = AmentIndex::from_prefix_path(":/opt/ros/humble::/ws/install/foo:");
        assert_eq!(
            index.prefixes(),
            &[PathBuf::from("/opt/ros/humble"), PathBuf::from("/ws/install/foo")]
        );
    }

    #[test]
    fn builder_appends_prefixes_in_order() {
        let index = AmentIndex::new(["/a"]).with_prefix("/b").with_prefixes(["/c", "/d"]);
        let prefixes: Vec<_> = index.prefixes().iter().map(|p| p.to_str().unwrap()).collect();
        assert_eq!(prefixes, ["/a", "/b", "/c", "/d"]);
    }

    #[test]
    fn rejects_package_names_with_separators() {
        let index = AmentIndex::default();
        for name in ["", "foo/bar", "../etc"] {
            assert!(matches!(
                index.package_prefix(name),
                Err(AmentError::InvalidPackageName(_))
            ));
        }
    }

    #[test]
    fn empty_index_finds_nothing() {
        let index = AmentIndex::default();
        assert!(matches!(
            index.package_share_directory("demo_nodes_cpp"),
            Err(AmentError::PackageNotFound(name)) if name == "demo_nodes_cpp"
        ));
        assert!(index.packages_with_prefixes().unwrap().is_empty());
    }
}
