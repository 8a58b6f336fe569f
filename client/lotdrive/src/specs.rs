//! Vehicle spec sheet asset.
//!
//! The sheet is a CSV file in the assets folder, loaded through a custom
//! asset loader so it arrives asynchronously like every other asset. Systems
//! that need it look it up through [`VehicleCatalog`] and tolerate frames
//! where it has not loaded yet.

use std::fmt;

use bevy::asset::io::Reader;
use bevy::asset::{AssetLoader, LoadContext, LoadState};
use bevy::prelude::*;
use bevy::reflect::TypePath;
use lotdrive_core::{SpecError, SpecTable};

use crate::launch_params::LaunchParams;

/// Plugin for the spec sheet asset and catalog.
pub struct SpecsPlugin;

impl Plugin for SpecsPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<VehicleSpecSheet>()
            .register_asset_loader(VehicleSpecLoader)
            .add_systems(Startup, start_loading_specs)
            .add_systems(Update, watch_spec_sheet);
    }
}

/// A parsed vehicle spec sheet.
#[derive(Asset, TypePath, Debug)]
pub struct VehicleSpecSheet(pub SpecTable);

/// Errors from loading a spec sheet.
#[derive(Debug)]
pub enum SpecLoadError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The file is not valid UTF-8.
    Utf8(std::str::Utf8Error),
    /// The file is not a valid spec sheet.
    Parse(SpecError),
}

impl fmt::Display for SpecLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read spec sheet: {e}"),
            Self::Utf8(e) => write!(f, "spec sheet is not valid UTF-8: {e}"),
            Self::Parse(e) => write!(f, "invalid spec sheet: {e}"),
        }
    }
}

impl std::error::Error for SpecLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Utf8(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for SpecLoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<std::str::Utf8Error> for SpecLoadError {
    fn from(e: std::str::Utf8Error) -> Self {
        Self::Utf8(e)
    }
}

impl From<SpecError> for SpecLoadError {
    fn from(e: SpecError) -> Self {
        Self::Parse(e)
    }
}

/// Parse raw sheet bytes.
fn parse_sheet(bytes: &[u8]) -> Result<SpecTable, SpecLoadError> {
    let text = std::str::from_utf8(bytes)?;
    Ok(SpecTable::parse(text)?)
}

/// Loader for `.csv` spec sheets.
#[derive(Default, TypePath)]
struct VehicleSpecLoader;

impl AssetLoader for VehicleSpecLoader {
    type Asset = VehicleSpecSheet;
    type Settings = ();
    type Error = SpecLoadError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let table = parse_sheet(&bytes)?;
        tracing::info!(
            "Loaded {} vehicle spec(s) from {}",
            table.len(),
            load_context.path()
        );
        Ok(VehicleSpecSheet(table))
    }

    fn extensions(&self) -> &[&str] {
        &["csv"]
    }
}

/// Handle to the spec sheet and its load status.
#[derive(Resource)]
pub struct VehicleCatalog {
    handle: Handle<VehicleSpecSheet>,
    /// Whether the load outcome has been logged.
    reported: bool,
}

impl VehicleCatalog {
    pub fn new(handle: Handle<VehicleSpecSheet>) -> Self {
        Self {
            handle,
            reported: false,
        }
    }

    /// The parsed table, once loaded.
    pub fn table<'a>(&self, sheets: &'a Assets<VehicleSpecSheet>) -> Option<&'a SpecTable> {
        sheets.get(&self.handle).map(|sheet| &sheet.0)
    }

    /// Whether the sheet has finished loading, successfully or not.
    pub fn is_settled(&self, asset_server: &AssetServer) -> bool {
        matches!(
            asset_server.load_state(&self.handle),
            LoadState::Loaded | LoadState::Failed(_)
        )
    }
}

/// Start loading the spec sheet on startup.
fn start_loading_specs(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    params: Res<LaunchParams>,
) {
    commands.insert_resource(VehicleCatalog::new(
        asset_server.load(params.specs_path.clone()),
    ));
    tracing::info!("Started loading vehicle specs from {}", params.specs_path);
}

/// Log a failed spec sheet load once. Cars keep their base constants.
fn watch_spec_sheet(mut catalog: ResMut<VehicleCatalog>, asset_server: Res<AssetServer>) {
    if catalog.reported {
        return;
    }
    match asset_server.load_state(&catalog.handle) {
        LoadState::Failed(err) => {
            tracing::error!("Vehicle specs failed to load: {err}; using base handling");
            catalog.reported = true;
        }
        LoadState::Loaded => {
            catalog.reported = true;
        }
        LoadState::NotLoaded | LoadState::Loading => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sheet() {
        let table = parse_sheet(b"File Name,Type\nsedan,Sedan\n").unwrap();
        assert_eq!(table.get("sedan").map(|s| s.category.as_str()), Some("Sedan"));
    }

    #[test]
    fn test_parse_sheet_errors() {
        assert!(matches!(
            parse_sheet(&[0xff, 0xfe, 0x00]),
            Err(SpecLoadError::Utf8(_))
        ));
        assert!(matches!(
            parse_sheet(b"Type\nSedan\n"),
            Err(SpecLoadError::Parse(SpecError::MissingColumn { .. }))
        ));
    }

    #[test]
    fn test_error_display_and_source() {
        let err = SpecLoadError::from(SpecError::EmptyInput);
        assert_eq!(err.to_string(), "invalid spec sheet: vehicle data is empty");
        assert!(std::error::Error::source(&err).is_some());
    }
}
