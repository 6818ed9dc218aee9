use image::{imageops::FilterType, DynamicImage, GenericImageView};
use imgpress_core::ResizeDirective;

/// Select a resampling filter from the scale factor
pub fn select_filter(orig_width: u32, orig_height: u32, new_width: u32, new_height: u32) -> FilterType {
    let width_ratio = orig_width as f32 / new_width.max(1) as f32;
    let height_ratio = orig_height as f32 / new_height.max(1) as f32;
    let max_ratio = width_ratio.max(height_ratio);

    if max_ratio > 2.0 {
        FilterType::Triangle
    } else if max_ratio > 1.5 {
        FilterType::CatmullRom
    } else {
        FilterType::Lanczos3
    }
}

/// Apply a resize directive. Unchanged dimensions return the image as is.
pub fn apply_resize(img: DynamicImage, directive: &ResizeDirective) -> DynamicImage {
    let (orig_width, orig_height) = img.dimensions();
    let (width, height) = directive.target_dimensions(orig_width, orig_height);

    if (width, height) == (orig_width, orig_height) {
        return img;
    }

    let filter = select_filter(orig_width, orig_height, width, height);
    img.resize_exact(width, height, filter)
}
