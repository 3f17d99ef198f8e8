use anyhow::Context;
use bytemuck::{Pod, Zeroable};
use ultraviolet::{Rotor2, Vec2};

use crate::Pt;
use crate::cast::{is_safely_castable, strict_cast};
use crate::round::{ceil_cast, floor_cast};
use crate::stream::{ObjectReader, ObjectWriter};

/// Rectangle bounds in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bounds {
    /// X coordinate of the top-left corner.
    pub(crate) x: Pt,
    /// Y coordinate of the top-left corner.
    pub(crate) y: Pt,
    /// Width of the bounds.
    pub(crate) width: Pt,
    /// Height of the bounds.
    pub(crate) height: Pt,
}

impl Bounds {
    /// Creates new bounds with the specified dimensions.
    pub fn new(x: Pt, y: Pt, width: Pt, height: Pt) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn x(&self) -> Pt {
        self.x
    }
    pub fn y(&self) -> Pt {
        self.y
    }
    pub fn width(&self) -> Pt {
        self.width
    }
    pub fn height(&self) -> Pt {
        self.height
    }
}

/// Bounds snapped outward to whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Geometry as little-endian `f32` bit patterns.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct ElementHeader {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    rotation: u32,
}

fn le_bits(v: f32) -> u32 {
    v.to_bits().to_le()
}

fn finite_result(field: &str, v: f32) -> anyhow::Result<Pt> {
    Pt::finite(v).ok_or_else(|| anyhow::anyhow!("image {field} overflows to {v}"))
}

fn finite_field(field: &str, bits: u32) -> anyhow::Result<f32> {
    let v = f32::from_bits(u32::from_le(bits));
    if !v.is_finite() {
        tracing::warn!(field, value = v, "non-finite image geometry");
        anyhow::bail!("image {field} {v} is not finite");
    }
    Ok(v)
}

/// A raster image placed on a page.
///
/// Holds the encoded image bytes (PNG, JPEG, ...) as they were inserted, plus
/// the geometry it is drawn with. Rotation is in radians around the center.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageElement {
    x: Pt,
    y: Pt,
    width: Pt,
    height: Pt,
    rotation: f32,
    payload: Vec<u8>,
    read: usize,
}

impl Default for ImageElement {
    fn default() -> Self {
        Self::new(Pt::ZERO, Pt::ZERO, Pt::ZERO, Pt::ZERO)
    }
}

impl ImageElement {
    pub const OBJECT_NAME: &'static str = "Image";

    pub fn new(x: Pt, y: Pt, width: Pt, height: Pt) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation: 0.0,
            payload: Vec::new(),
            read: 0,
        }
    }

    pub fn with_payload(mut self, payload: Vec<u8>) -> Self {
        self.set_payload(payload);
        self
    }

    pub fn x(&self) -> Pt {
        self.x
    }

    pub fn y(&self) -> Pt {
        self.y
    }

    pub fn width(&self) -> Pt {
        self.width
    }

    pub fn height(&self) -> Pt {
        self.height
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_position(&mut self, x: Pt, y: Pt) {
        self.x = x;
        self.y = y;
    }

    pub fn set_width(&mut self, width: Pt) {
        self.width = width;
    }

    pub fn set_height(&mut self, height: Pt) {
        self.height = height;
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Replaces the encoded image and rewinds the payload reader.
    pub fn set_payload(&mut self, payload: Vec<u8>) {
        self.payload = payload;
        self.read = 0;
    }

    /// Scales position relative to `(x0, y0)` and size by `(fx, fy)`.
    ///
    /// # Errors
    /// Returns an error, leaving the element untouched, if any resulting
    /// coordinate is not finite.
    pub fn scale(&mut self, x0: Pt, y0: Pt, fx: f32, fy: f32) -> anyhow::Result<()> {
        let x = finite_result("x", (self.x.as_f32() - x0.as_f32()) * fx + x0.as_f32())?;
        let y = finite_result("y", (self.y.as_f32() - y0.as_f32()) * fy + y0.as_f32())?;
        let width = finite_result("width", self.width.as_f32() * fx)?;
        let height = finite_result("height", self.height.as_f32() * fy)?;

        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Rotates the element's center around `(x0, y0)` by `th` radians.
    ///
    /// # Errors
    /// Returns an error, leaving the element untouched, for a non-finite
    /// angle or a center that overflows.
    pub fn rotate(&mut self, x0: Pt, y0: Pt, th: f32) -> anyhow::Result<()> {
        let rotation = self.rotation + th;
        if !rotation.is_finite() {
            anyhow::bail!("rotation by {th} gives a non-finite angle");
        }

        let origin = Vec2::new(x0.as_f32(), y0.as_f32());
        let mut center = self.center() - origin;
        Rotor2::from_angle(th).rotate_vec(&mut center);
        let center = center + origin;

        let x = finite_result("x", center.x - self.width.as_f32() / 2.0)?;
        let y = finite_result("y", center.y - self.height.as_f32() / 2.0)?;

        self.x = x;
        self.y = y;
        self.rotation = rotation;
        Ok(())
    }

    fn center(&self) -> Vec2 {
        Vec2::new(
            self.x.as_f32() + self.width.as_f32() / 2.0,
            self.y.as_f32() + self.height.as_f32() / 2.0,
        )
    }

    fn corners(&self) -> [Vec2; 4] {
        let center = self.center();
        let hw = self.width.as_f32() / 2.0;
        let hh = self.height.as_f32() / 2.0;
        let rotor = Rotor2::from_angle(self.rotation);

        [
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ]
        .map(|mut corner| {
            if self.rotation != 0.0 {
                rotor.rotate_vec(&mut corner);
            }
            corner + center
        })
    }

    /// Axis-aligned pixel box covering the rotated image.
    ///
    /// # Errors
    /// Returns an error if an edge falls outside the `i32` pixel grid.
    pub fn pixel_bounds(&self) -> anyhow::Result<PixelRect> {
        let corners = self.corners();
        let (min, max) = corners[1..].iter().fold((corners[0], corners[0]), |(lo, hi), c| {
            (lo.min_by_component(*c), hi.max_by_component(*c))
        });

        let edges = [
            ("left", min.x.floor()),
            ("top", min.y.floor()),
            ("right", max.x.ceil()),
            ("bottom", max.y.ceil()),
        ];
        for (edge, v) in edges {
            if !is_safely_castable::<i32, f32>(v) {
                tracing::warn!(edge, value = v, "image edge outside the pixel grid");
                anyhow::bail!("{edge} edge {v} is outside the pixel grid");
            }
        }

        let x: i32 = floor_cast(min.x);
        let y: i32 = floor_cast(min.y);
        let right: i32 = ceil_cast(max.x);
        let bottom: i32 = ceil_cast(max.y);

        Ok(PixelRect {
            x,
            y,
            width: strict_cast(i64::from(right) - i64::from(x)),
            height: strict_cast(i64::from(bottom) - i64::from(y)),
        })
    }

    pub fn read_position(&self) -> usize {
        self.read
    }

    /// Copies the next chunk of the payload into `buf`.
    ///
    /// Returns the number of bytes copied, which is less than `buf.len()` only
    /// for the final chunk.
    ///
    /// # Errors
    /// Returns an error if the whole payload has already been read.
    pub fn read_payload(&mut self, buf: &mut [u8]) -> anyhow::Result<usize> {
        if self.read >= self.payload.len() {
            anyhow::bail!(
                "image payload exhausted at byte {} of {}",
                self.read,
                self.payload.len()
            );
        }
        let n = buf.len().min(self.payload.len() - self.read);
        buf[..n].copy_from_slice(&self.payload[self.read..self.read + n]);
        self.read += n;
        Ok(n)
    }

    /// Moves the payload reader to an externally supplied offset.
    ///
    /// # Errors
    /// Returns an error for a negative offset or one past the payload end.
    pub fn seek(&mut self, offset: i64) -> anyhow::Result<()> {
        if !is_safely_castable::<usize, i64>(offset) {
            anyhow::bail!("invalid payload offset {offset}");
        }
        let offset: usize = strict_cast(offset);
        if offset > self.payload.len() {
            anyhow::bail!(
                "payload offset {offset} past the end ({} bytes)",
                self.payload.len()
            );
        }
        self.read = offset;
        Ok(())
    }

    pub fn rewind(&mut self) {
        self.read = 0;
    }

    pub fn serialize(&self, out: &mut ObjectWriter) {
        out.begin_object(Self::OBJECT_NAME);
        out.write_pod(&ElementHeader {
            x: le_bits(self.x.as_f32()),
            y: le_bits(self.y.as_f32()),
            width: le_bits(self.width.as_f32()),
            height: le_bits(self.height.as_f32()),
            rotation: le_bits(self.rotation),
        });
        out.write_bytes(&self.payload);
        out.end_object();
    }

    /// Replaces this element with the next `Image` object of `input`.
    ///
    /// # Errors
    /// Returns an error if the stream is truncated, holds another object,
    /// carries an invalid payload length or non-finite geometry.
    pub fn read_serialized(&mut self, input: &mut ObjectReader<'_>) -> anyhow::Result<()> {
        let start = input.position();
        input
            .read_object(Self::OBJECT_NAME)
            .with_context(|| format!("reading image element at byte {start}"))?;
        let header: ElementHeader = input.read_pod().context("reading image geometry")?;
        let payload = input.read_bytes().context("reading image payload")?;
        input.end_object().context("closing image element")?;

        let x = finite_field("x", header.x)?;
        let y = finite_field("y", header.y)?;
        let width = finite_field("width", header.width)?;
        let height = finite_field("height", header.height)?;
        let rotation = finite_field("rotation", header.rotation)?;

        tracing::debug!(
            payload_len = payload.len(),
            width,
            height,
            "read image element"
        );

        self.x = Pt(x);
        self.y = Pt(y);
        self.width = Pt(width);
        self.height = Pt(height);
        self.rotation = rotation;
        self.set_payload(payload);
        Ok(())
    }

    /// Pixel dimensions stored in the payload's image header.
    #[cfg(feature = "utils")]
    pub fn decode_dimensions(&self) -> anyhow::Result<(u32, u32)> {
        let reader = ::image::ImageReader::new(std::io::Cursor::new(self.payload.as_slice()))
            .with_guessed_format()
            .context("guessing image format")?;
        reader.into_dimensions().context("decoding image header")
    }

    /// Sets width and height to the payload's pixel dimensions.
    #[cfg(feature = "utils")]
    pub fn fit_to_payload(&mut self) -> anyhow::Result<()> {
        let (w, h) = self.decode_dimensions()?;
        if !is_safely_castable::<f32, u32>(w) || !is_safely_castable::<f32, u32>(h) {
            anyhow::bail!("image of {w}x{h} pixels is too large");
        }
        self.width = Pt::from(w);
        self.height = Pt::from(h);
        Ok(())
    }
}
