//! `get` and `profile <SELECTOR> get`: read-only, so never queued.

use std::path::Path;

use termino::model::{ColorField, ProfileSelector, SettingsModel};
use termino::store::SettingsReader;
use termino::ui::RenderSink;

/// Show every profile, or only the one `selector` picks.
pub(crate) fn run_get(
    path: &Path,
    reader: &dyn SettingsReader,
    selector: Option<&ProfileSelector>,
    sink: &dyn RenderSink,
) -> bool {
    let model = match reader.read(path) {
        Ok(loaded) => loaded.model,
        Err(err) => {
            sink.error(&err.to_string());
            return false;
        }
    };
    let positions = match selector {
        Some(selector) => match selector.resolve(&model) {
            Ok(position) => vec![position],
            Err(err) => {
                sink.error(&err.to_string());
                return false;
            }
        },
        None => (0..model.profiles().len()).collect(),
    };
    if positions.is_empty() {
        sink.warn(&format!("`{}` has no profiles", path.display()));
    }
    let default = ProfileSelector::Default.resolve(&model).ok();
    for position in positions {
        show_profile(&model, position, default == Some(position), sink);
    }
    true
}

fn show_profile(model: &SettingsModel, position: usize, is_default: bool, sink: &dyn RenderSink) {
    let Some(profile) = model.profile(position) else {
        return;
    };
    let marker = if is_default { " (default)" } else { "" };
    sink.section(&format!("[{position}] {}{marker}", profile.label()));
    if let Some(guid) = profile.guid() {
        sink.field("guid", guid);
    }
    for field in ColorField::ALL {
        sink.color_field(field.key(), profile.color(field));
    }
}
