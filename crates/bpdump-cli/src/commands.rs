//! CLI command implementations.

use crate::config::{Config, Overrides, CONFIG_DIR};
use bpdump_core::{path, AssetEntry, CollectionKind, HostView, SnapshotStore, SnapshotView};
use bpdump_graph::extract;
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Writing a finished document failed.
#[derive(Error, Debug)]
#[error("failed to write {target}: {source}")]
pub struct WriteError {
    target: String,
    #[source]
    source: io::Error,
}

/// Maps a command failure to the process exit code.
pub fn exit_code(err: &(dyn std::error::Error + 'static)) -> i32 {
    if err.is::<WriteError>() {
        3
    } else if err.is::<bpdump_core::Error>() {
        2
    } else {
        1
    }
}

/// Follow-up advice for failures the user can act on.
pub fn hint(err: &(dyn std::error::Error + 'static)) -> Option<&'static str> {
    match err.downcast_ref::<bpdump_core::Error>() {
        Some(e) if e.is_resolution_failure() => Some("bpdump list"),
        _ => None,
    }
}

/// Config and store shared by the commands that read snapshots.
pub struct Context {
    pub config: Config,
    pub store: SnapshotStore,
}

impl Context {
    pub fn load(store: Option<&Path>, config: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let config = Config::resolve(config, &cwd)?;
        let root = store
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.join(&config.store_root));
        let store = SnapshotStore::new(root);
        debug!("Snapshot store at {}", store.root().display());

        Ok(Self { config, store })
    }
}

/// Initialize bpdump in a directory.
pub fn init(path: &Path) -> Result<()> {
    let config_dir = path.join(CONFIG_DIR);

    if config_dir.exists() {
        println!("{} Already initialized", "✓".green());
        return Ok(());
    }

    fs::create_dir_all(&config_dir)?;
    fs::write(Config::path_in(path), Config::default().to_json()?)?;

    println!("{} Initialized bpdump in {}", "✓".green(), path.display());
    println!("  Run {} to dump a blueprint", "bpdump graph <ASSET>".cyan());

    Ok(())
}

/// Dump the graphs of one blueprint.
pub fn graph(
    ctx: &Context,
    asset: &str,
    graph_name: Option<&str>,
    overrides: &Overrides,
    output: Option<&Path>,
) -> Result<()> {
    let settings = ctx.config.defaults.merge(overrides);
    let options = settings.extract_options(graph_name);

    let snapshot = ctx.store.load_blueprint(asset)?;
    let view = SnapshotView::new(&snapshot)?;

    let mut document = extract(&view, asset, &options);
    if settings.stamp_time {
        document = document.stamped(chrono::Utc::now());
    }

    if document.graphs.is_empty() {
        info!("No graph matched in {}", asset);
    }

    emit(&document.to_json(settings.pretty)?, output)
}

#[derive(Serialize)]
struct Catalog<'a> {
    filter: String,
    common_root: Option<String>,
    assets: &'a [AssetEntry],
}

/// List the snapshots under a content folder.
pub fn list(ctx: &Context, filter: &str, output: Option<&Path>) -> Result<()> {
    let assets = ctx.store.list(filter)?;
    let package_paths: Vec<&str> = assets.iter().map(|a| a.package_path.as_str()).collect();

    let catalog = Catalog {
        filter: path::normalize(filter),
        common_root: path::longest_common_prefix(&package_paths),
        assets: &assets,
    };
    info!("Found {} assets under {}", assets.len(), catalog.filter);

    emit(&render(&catalog, ctx.config.defaults.pretty)?, output)
}

#[derive(Serialize)]
struct AssetInfo<'a> {
    asset_path: &'a str,
    object_name: &'a str,
    class_name: &'a str,
    tags: &'a BTreeMap<String, String>,
    graph_counts: BTreeMap<&'static str, usize>,
}

/// Show basic information about one asset.
///
/// Graph counts are taken from the resolved view, so they match what
/// `graph` would seed from.
pub fn asset(ctx: &Context, asset: &str, output: Option<&Path>) -> Result<()> {
    let snapshot = ctx.store.load(asset)?;
    let view = SnapshotView::new(&snapshot)?;

    let info = AssetInfo {
        asset_path: asset,
        object_name: &snapshot.name,
        class_name: &snapshot.class_name,
        tags: &snapshot.tags,
        graph_counts: CollectionKind::ALL
            .into_iter()
            .filter_map(|kind| Some((kind.as_str(), view.collection(kind)?.len())))
            .collect(),
    };

    emit(&render(&info, ctx.config.defaults.pretty)?, output)
}

fn render<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    let mut text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    text.push('\n');
    Ok(text)
}

/// Writes a document to `output`, or to stdout when there is none.
fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    let Some(path) = output else {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(text.as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(|source| WriteError {
                target: "stdout".to_string(),
                source,
            })?;
        return Ok(());
    };

    write_file(path, text).map_err(|source| WriteError {
        target: path.display().to_string(),
        source,
    })?;
    println!("{} Wrote {}", "✓".green(), path.display());
    Ok(())
}

fn write_file(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bpdump_core::{AssetSnapshot, CollectionKind, GraphSnapshot};
    use tempfile::tempdir;

    fn context(root: &Path) -> Context {
        Context {
            config: Config::default(),
            store: SnapshotStore::new(root),
        }
    }

    fn put(root: &Path, relative: &str, snapshot: &AssetSnapshot) {
        let file = root.join(relative);
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(file, serde_json::to_string(snapshot).unwrap()).unwrap();
    }

    fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_graph_writes_output_file() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("Content");
        put(
            &root,
            "Game/BP_Door.json",
            &AssetSnapshot::new("BP_Door", "Blueprint")
                .with_graph(GraphSnapshot::new("e", "EventGraph"))
                .with_collection(CollectionKind::UbergraphPages, ["e"]),
        );

        let out = dir.path().join("out/nested/door.json");
        let ctx = context(&root);
        graph(&ctx, "/Game/BP_Door.BP_Door", None, &Overrides::default(), Some(&out)).unwrap();

        let value = read_json(&out);
        assert_eq!(value["blueprint_name"], "BP_Door");
        assert_eq!(value["graphs"][0]["graph_name"], "EventGraph");
        assert!(value.get("generated_at").is_none());
    }

    #[test]
    fn test_missing_asset_maps_to_extraction_exit_code() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("never.json");
        let ctx = context(dir.path());
        let err =
            graph(&ctx, "/Game/Missing", None, &Overrides::default(), Some(&out)).unwrap_err();

        assert_eq!(exit_code(err.as_ref()), 2);
        assert_eq!(hint(err.as_ref()), Some("bpdump list"));
        assert!(!out.exists());
    }

    #[test]
    fn test_non_blueprint_is_rejected() {
        let dir = tempdir().unwrap();
        put(dir.path(), "Game/T_Brick.json", &AssetSnapshot::new("T_Brick", "Texture2D"));

        let ctx = context(dir.path());
        let err = graph(&ctx, "/Game/T_Brick", None, &Overrides::default(), None).unwrap_err();
        assert_eq!(exit_code(err.as_ref()), 2);
        assert_eq!(hint(err.as_ref()), Some("bpdump list"));
    }

    #[test]
    fn test_broken_snapshot_has_no_hint() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Game")).unwrap();
        fs::write(dir.path().join("Game/BP_Broken.json"), "{").unwrap();

        let ctx = context(dir.path());
        let err = graph(&ctx, "/Game/BP_Broken", None, &Overrides::default(), None).unwrap_err();
        assert_eq!(exit_code(err.as_ref()), 2);
        assert_eq!(hint(err.as_ref()), None);
    }

    #[test]
    fn test_list_reports_common_root() {
        let dir = tempdir().unwrap();
        put(dir.path(), "Game/Proj/BP_Car.json", &AssetSnapshot::new("BP_Car", "Blueprint"));
        put(
            dir.path(),
            "Game/Proj/Input/IMC_Default.json",
            &AssetSnapshot::new("IMC_Default", "InputMappingContext"),
        );

        let out = dir.path().join("catalog.json");
        list(&context(dir.path()), "/Game/", Some(&out)).unwrap();

        let value = read_json(&out);
        assert_eq!(value["filter"], "/Game");
        assert_eq!(value["common_root"], "/Game/Proj");
        assert_eq!(value["assets"].as_array().unwrap().len(), 2);
        assert_eq!(value["assets"][0]["object_path"], "/Game/Proj/BP_Car.BP_Car");
        assert_eq!(value["assets"][1]["class_name"], "InputMappingContext");
    }

    #[test]
    fn test_list_without_shared_root() {
        let dir = tempdir().unwrap();
        put(dir.path(), "Game/A/BP_A.json", &AssetSnapshot::new("BP_A", "Blueprint"));
        put(dir.path(), "Other/BP_B.json", &AssetSnapshot::new("BP_B", "Blueprint"));

        let out = dir.path().join("catalog.json");
        list(&context(dir.path()), "/", Some(&out)).unwrap();

        let value = read_json(&out);
        assert!(value["common_root"].is_null());
        assert_eq!(value["assets"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_asset_reports_tags_and_resolved_counts() {
        let dir = tempdir().unwrap();
        put(
            dir.path(),
            "Game/BP_Door.json",
            &AssetSnapshot::new("BP_Door", "Blueprint")
                .with_tag("ParentClass", "Actor")
                .with_graph(GraphSnapshot::new("e", "EventGraph"))
                .with_graph(GraphSnapshot::new("f", "Open"))
                .with_collection(CollectionKind::UbergraphPages, ["e"])
                .with_collection(CollectionKind::FunctionGraphs, ["f", "missing"]),
        );

        let out = dir.path().join("asset.json");
        asset(&context(dir.path()), "/Game/BP_Door.BP_Door", Some(&out)).unwrap();

        let value = read_json(&out);
        assert_eq!(value["object_name"], "BP_Door");
        assert_eq!(value["class_name"], "Blueprint");
        assert_eq!(value["tags"]["ParentClass"], "Actor");
        assert_eq!(
            value["graph_counts"],
            serde_json::json!({ "function_graphs": 1, "ubergraph_pages": 1 })
        );
    }

    #[test]
    fn test_write_failure_exit_code() {
        let dir = tempdir().unwrap();
        // A file where a directory is needed.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let err = emit("{}\n", Some(&blocker.join("out.json"))).unwrap_err();
        assert_eq!(exit_code(err.as_ref()), 3);
    }

    #[test]
    fn test_init_creates_config_once() {
        let dir = tempdir().unwrap();
        init(dir.path()).unwrap();
        let config = Config::load(&Config::path_in(dir.path())).unwrap();
        assert_eq!(config, Config::default());

        // Second run leaves the file alone.
        fs::write(Config::path_in(dir.path()), "{}").unwrap();
        init(dir.path()).unwrap();
        assert_eq!(fs::read_to_string(Config::path_in(dir.path())).unwrap(), "{}");
    }
}
