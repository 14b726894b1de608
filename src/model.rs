//! Model handles and the local-cache / registry resolution of TorchScript artifacts.
use std::io::{self, Cursor};
use std::path::Path;

use tch::{CModule, Device, Tensor};
use tracing::{info, warn};

use crate::config::Config;
use crate::fetch;
use crate::registry::ModelRegistry;
use crate::resolve::{first_success, Strategy};
use crate::{Error, Result};

/// A classifier mapping a `[1, H, W, 3]` float batch to `[1, C]` scores.
pub trait Model: std::fmt::Debug + Send {
    fn forward(&self, images: &Tensor) -> Result<Tensor>;
}

impl Model for CModule {
    fn forward(&self, images: &Tensor) -> Result<Tensor> {
        Ok(self.forward_ts(&[images])?)
    }
}

fn into_eval(mut module: CModule) -> Result<CModule> {
    module.f_set_eval()?;
    Ok(module)
}

/// Loads a TorchScript artifact from a file.
pub fn load_local<P: AsRef<Path>>(path: P, device: Device) -> Result<CModule> {
    let path = path.as_ref();
    if !path.is_file() {
        let msg = format!("no artifact at {}", path.display());
        return Err(io::Error::new(io::ErrorKind::NotFound, msg).into());
    }
    let module = CModule::load_on_device(path, device)?;
    into_eval(module)
}

/// Fetches a TorchScript artifact and loads it in memory. The raw bytes are
/// returned alongside so that they can be persisted.
pub fn load_remote(locator: &str, device: Device) -> Result<(CModule, Vec<u8>)> {
    let bytes = fetch::fetch_bytes(locator)?;
    let module = CModule::load_data_on_device(&mut Cursor::new(&bytes), device)?;
    Ok((into_eval(module)?, bytes))
}

/// Resolves `name` to a loaded model.
///
/// The cache directory is tried first, then the save directory, then the
/// registry locator. A model fetched remotely is written to the save
/// directory; failing to do so is logged and the in-memory model is still
/// returned.
pub fn resolve_model(name: &str, config: &Config, registry: &ModelRegistry) -> Result<Box<dyn Model>> {
    let cached = config.cached_model_path(name);
    let saved = config.saved_model_path(name);
    let strategies: Vec<Strategy<'_, CModule>> = vec![
        Strategy::new(format!("{}", cached.display()), || load_local(&cached, config.device)),
        Strategy::new(format!("{}", saved.display()), || load_local(&saved, config.device)),
        Strategy::new("registry", || {
            let locator =
                registry.locator(name).ok_or_else(|| Error::UnknownModelName(name.to_string()))?;
            let (module, bytes) = load_remote(locator, config.device).map_err(|err| {
                Error::ModelUnavailable { name: name.to_string(), reason: err.to_string() }
            })?;
            match fetch::write_creating_dirs(&saved, &bytes) {
                Ok(()) => info!("model {name} saved to {}", saved.display()),
                Err(err) => warn!("cannot save model {name} to {}: {err}", saved.display()),
            }
            Ok(module)
        }),
    ];
    let module = first_success(&format!("model {name}"), strategies)?;
    Ok(Box::new(module))
}
