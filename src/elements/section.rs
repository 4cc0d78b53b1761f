//! Section properties for frame members
//!
//! The x-axis is the strong (major) axis and the y-axis the weak (minor)
//! axis, as in the AISC shapes tables.

use serde::{Deserialize, Serialize};

/// Cross-section properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    /// Gross area Ag
    pub a: f64,
    /// Moment of inertia about the strong axis
    pub ix: f64,
    /// Moment of inertia about the weak axis
    pub iy: f64,
    /// Elastic section modulus, strong axis
    pub sx: f64,
    /// Elastic section modulus, weak axis
    pub sy: f64,
    /// Plastic section modulus, strong axis
    pub zx: f64,
    /// Plastic section modulus, weak axis
    pub zy: f64,
    /// Torsional constant
    pub j: f64,
    /// Warping constant
    pub cw: f64,
    /// Overall depth d
    pub depth: f64,
    /// Web thickness tw
    pub web_thickness: f64,
    /// Flange width bf (None for sections without flanges)
    #[serde(default)]
    pub flange_width: Option<f64>,
    /// Flange thickness tf
    #[serde(default)]
    pub flange_thickness: Option<f64>,
}

impl Section {
    /// Create a wide flange (I-shape) section
    ///
    /// # Arguments
    /// * `depth` - Total depth of section
    /// * `flange_width` - Width of flange
    /// * `flange_thickness` - Thickness of flange
    /// * `web_thickness` - Thickness of web
    pub fn wide_flange(
        name: &str,
        depth: f64,
        flange_width: f64,
        flange_thickness: f64,
        web_thickness: f64,
    ) -> Self {
        let d = depth;
        let bf = flange_width;
        let tf = flange_thickness;
        let tw = web_thickness;
        let hw = d - 2.0 * tf;
        let ho = d - tf;

        let a = 2.0 * bf * tf + hw * tw;
        let ix = (bf * d.powi(3) - (bf - tw) * hw.powi(3)) / 12.0;
        let iy = (2.0 * tf * bf.powi(3) + hw * tw.powi(3)) / 12.0;
        let zx = bf * tf * ho + tw * hw.powi(2) / 4.0;
        let zy = tf * bf.powi(2) / 2.0 + hw * tw.powi(2) / 4.0;
        let j = (2.0 * bf * tf.powi(3) + ho * tw.powi(3)) / 3.0;
        let cw = iy * ho.powi(2) / 4.0;

        Self {
            name: name.to_string(),
            a,
            ix,
            iy,
            sx: 2.0 * ix / d,
            sy: 2.0 * iy / bf,
            zx,
            zy,
            j,
            cw,
            depth: d,
            web_thickness: tw,
            flange_width: Some(bf),
            flange_thickness: Some(tf),
        }
    }

    /// Create a solid rectangular bar, `depth` measured along the strong axis
    pub fn rectangular(name: &str, width: f64, depth: f64) -> Self {
        let (long, short) = if width > depth { (width, depth) } else { (depth, width) };
        let j = long * short.powi(3) / 3.0 * (1.0 - 0.63 * short / long);

        Self {
            name: name.to_string(),
            a: width * depth,
            ix: width * depth.powi(3) / 12.0,
            iy: depth * width.powi(3) / 12.0,
            sx: width * depth.powi(2) / 6.0,
            sy: depth * width.powi(2) / 6.0,
            zx: width * depth.powi(2) / 4.0,
            zy: depth * width.powi(2) / 4.0,
            j,
            cw: 0.0,
            depth,
            web_thickness: width,
            flange_width: None,
            flange_thickness: None,
        }
    }

    /// Radius of gyration about the strong axis
    pub fn rx(&self) -> f64 {
        radius_of_gyration(self.ix, self.a)
    }

    /// Radius of gyration about the weak axis
    pub fn ry(&self) -> f64 {
        radius_of_gyration(self.iy, self.a)
    }

    /// Distance between flange centroids ho
    pub fn ho(&self) -> f64 {
        self.depth - self.flange_thickness.unwrap_or(0.0)
    }

    /// Clear web height h used for web slenderness
    pub fn web_height(&self) -> f64 {
        self.depth - 2.0 * self.flange_thickness.unwrap_or(0.0)
    }

    /// Effective radius of gyration for LTB, rts² = sqrt(Iy·Cw)/Sx (AISC F2-7)
    pub fn rts(&self) -> f64 {
        if self.sx <= 0.0 {
            return 0.0;
        }
        let rts2 = (self.iy * self.cw).sqrt() / self.sx;
        if rts2 > 0.0 {
            rts2.sqrt()
        } else {
            // No warping data: fall back to the weak-axis radius of gyration
            self.ry()
        }
    }
}

fn radius_of_gyration(i: f64, a: f64) -> f64 {
    if a > 0.0 && i > 0.0 {
        (i / a).sqrt()
    } else {
        0.0
    }
}

impl Default for Section {
    fn default() -> Self {
        // W310x97 approximate dimensions (mm)
        Self::wide_flange("W310x97", 308.0, 305.0, 15.4, 9.9)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rectangular_section() {
        let s = Section::rectangular("R", 300.0, 500.0);
        assert_relative_eq!(s.a, 150_000.0);
        assert_relative_eq!(s.ix, 300.0 * 500.0_f64.powi(3) / 12.0);
        assert_relative_eq!(s.sx, s.ix / 250.0, max_relative = 1e-12);
        assert_eq!(s.cw, 0.0);
        // Without warping rts falls back to ry
        assert_relative_eq!(s.rts(), s.ry());
    }

    #[test]
    fn test_wide_flange_properties() {
        let s = Section::wide_flange("W", 300.0, 200.0, 15.0, 10.0);
        let hw = 270.0;
        assert_relative_eq!(s.a, 2.0 * 200.0 * 15.0 + hw * 10.0);
        assert!(s.zx > s.sx, "plastic modulus exceeds elastic modulus");
        assert!(s.zy > s.sy);
        assert!(s.ix > s.iy);
        assert_relative_eq!(s.ho(), 285.0);
        assert_relative_eq!(s.web_height(), 270.0);
        assert_relative_eq!(s.cw, s.iy * 285.0_f64.powi(2) / 4.0);
        assert!(s.rts() > 0.0);
    }
}
