//! `objload`: load an OBJ file through the registered mesh-loader plugin and
//! print what the renderer would receive.
//!
//! Usage: objload [--name=<mesh>] [--backend=memory|wgpu] [--dump-indices] <file.obj>

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plugin::{Host, plugin_main};
use renderer::{Mesh, MemoryBackend, RenderBackend, WgpuBackend};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BackendKind {
    Memory,
    Wgpu,
}

#[derive(Debug)]
struct Options {
    path: PathBuf,
    name: String,
    backend: BackendKind,
    dump_indices: bool,
}

fn parse_backend_arg(args: &[String]) -> BackendKind {
    // Accept: --backend=memory|wgpu
    let mut backend = BackendKind::Memory;
    for arg in args {
        if let Some(val) = arg.strip_prefix("--backend=") {
            backend = match val.to_ascii_lowercase().as_str() {
                "memory" | "mem" => BackendKind::Memory,
                "wgpu" | "gpu" => BackendKind::Wgpu,
                other => {
                    log::warn!("Unknown backend '{}', falling back to memory.", other);
                    BackendKind::Memory
                }
            };
        }
    }
    backend
}

fn parse_options(args: &[String]) -> Result<Options> {
    let path = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .map(PathBuf::from)
        .context("Usage: objload [--name=<mesh>] [--backend=memory|wgpu] [--dump-indices] <file.obj>")?;

    let name = args
        .iter()
        .find_map(|a| a.strip_prefix("--name="))
        .map(str::to_string)
        .unwrap_or_else(|| default_mesh_name(&path));

    Ok(Options {
        name,
        backend: parse_backend_arg(args),
        dump_indices: args.iter().any(|a| a == "--dump-indices"),
        path,
    })
}

fn default_mesh_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mesh")
        .to_string()
}

fn print_summary(mesh: &Mesh) {
    println!("mesh '{}'", mesh.name);
    for attrib in &mesh.vertex.attribs {
        println!(
            "  stream {:<9} {:?} stride={}",
            attrib.name, attrib.format, attrib.stride
        );
    }
    for sub in &mesh.submeshes {
        println!(
            "  submesh '{}': {} indices ({:?}, base {})",
            sub.name, sub.index_count, sub.element, sub.base_index
        );
    }
}

fn dump_indices(mesh: &Mesh, backend: &MemoryBackend) {
    for sub in &mesh.submeshes {
        if let Some(stored) = backend.get(sub.index_buffer) {
            let indices: Vec<u32> = bytemuck::pod_collect_to_vec(&stored.contents);
            println!("  {}: {:?}", sub.name, indices);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = parse_options(&args)?;
    log::info!(
        "Loading '{}' as '{}'. Backend: {:?}, dump_indices={}",
        opts.path.display(),
        opts.name,
        opts.backend,
        opts.dump_indices
    );

    let plugin = plugin_main();
    let mut host = Host::new();
    plugin
        .inscribe(&mut host)
        .with_context(|| format!("Failed to load plugin {}", plugin.name()))?;

    let load = |backend: &mut dyn RenderBackend| {
        host.load_mesh(&opts.name, &opts.path, backend)
            .with_context(|| format!("Failed to load mesh from {}", opts.path.display()))
    };

    match opts.backend {
        BackendKind::Memory => {
            let mut backend = MemoryBackend::new();
            let mesh = load(&mut backend)?;
            print_summary(&mesh);
            println!(
                "  {} buffer(s), {} bytes",
                backend.buffers().len(),
                backend.total_bytes()
            );
            if opts.dump_indices {
                dump_indices(&mesh, &backend);
            }
        }
        BackendKind::Wgpu => {
            let mut backend = WgpuBackend::new_headless()?;
            let mesh = load(&mut backend)?;
            print_summary(&mesh);
            if opts.dump_indices {
                log::warn!("--dump-indices is only available with --backend=memory");
            }
        }
    }

    plugin.unscribe(&mut host);
    log::info!("Done.");
    Ok(())
}
