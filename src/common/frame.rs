use chrono::{DateTime, Utc};
use image::DynamicImage;
use std::sync::Arc;
use uuid::Uuid;

/// A preview bitmap captured for one dispatch, tagged with the session it belongs to.
#[derive(Clone)]
pub struct Frame {
    session_id: Uuid,
    image: Arc<DynamicImage>,
    captured_at: DateTime<Utc>,
    frame_id: Uuid,
}

impl Frame {
    pub fn new(session_id: Uuid, image: DynamicImage) -> Self {
        Self {
            session_id,
            image: Arc::new(image),
            captured_at: Utc::now(),
            frame_id: Uuid::new_v4(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn frame_id(&self) -> Uuid {
        self.frame_id
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    #[test]
    fn cloning_frame_shares_image_buffer() {
        let img = DynamicImage::ImageRgba8(ImageBuffer::<Rgba<u8>, Vec<u8>>::from_pixel(
            16,
            8,
            Rgba([1, 2, 3, 255]),
        ));
        let f1 = Frame::new(Uuid::new_v4(), img);
        let f2 = f1.clone();
        assert!(Arc::ptr_eq(&f1.image, &f2.image));
        assert_eq!(f1.frame_id(), f2.frame_id());
        assert_eq!(f2.dimensions(), (16, 8));
    }
}
