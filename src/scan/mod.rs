//! Turns fetched page content into weighted color samples.

pub mod css;
pub mod image;

use tracing::{debug, warn};

use crate::fetch::PageContent;
use crate::pipeline::aggregate::ColorSample;

/// Default number of K-means clusters per image.
pub const DEFAULT_IMAGE_COLORS: usize = 5;

/// Scan the HTML, every stylesheet and every image of a page.
///
/// Images that fail to decode are skipped with a warning.
pub fn scan_page(page: &PageContent, image_colors: usize) -> Vec<ColorSample> {
    let mut samples = css::scan_css(&page.html);
    for stylesheet in &page.stylesheets {
        samples.extend(css::scan_css(stylesheet));
    }
    let css_count = samples.len();

    for asset in &page.images {
        match self::image::scan_image(&asset.bytes, image_colors) {
            Ok(found) => samples.extend(found),
            Err(err) => warn!(image = %asset.location, "skipping image: {err:#}"),
        }
    }

    debug!(
        css = css_count,
        image = samples.len() - css_count,
        "scanned page"
    );
    samples
}
