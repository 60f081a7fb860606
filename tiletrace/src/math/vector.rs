use std::ops::{Add, AddAssign, Div, Index, Mul, MulAssign, Neg, Sub, SubAssign};

use super::common::{FloatValueType, ValueType};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Vectors.html

/// Generic two-component vector
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vec2<T>
where
    T: ValueType,
{
    pub x: T,
    pub y: T,
}

/// Generic three-component vector
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vec3<T>
where
    T: ValueType,
{
    pub x: T,
    pub y: T,
    pub z: T,
}

/// Shorthand constructor for [Vec2]
pub fn vec2<T>(x: T, y: T) -> Vec2<T>
where
    T: ValueType,
{
    Vec2::new(x, y)
}

/// Shorthand constructor for [Vec3]
pub fn vec3<T>(x: T, y: T, z: T) -> Vec3<T>
where
    T: ValueType,
{
    Vec3::new(x, y, z)
}

impl<T> Vec2<T>
where
    T: ValueType,
{
    pub fn new(x: T, y: T) -> Self {
        let v = Self { x, y };
        debug_assert!(!v.has_nans());
        v
    }

    pub fn zeros() -> Self {
        Self {
            x: T::zero(),
            y: T::zero(),
        }
    }

    /// Returns `true` if any component is NaN.
    pub fn has_nans(&self) -> bool {
        // Cast to f64 since it is currently the largest floating point type
        self.x.to_f64().unwrap_or(f64::NAN).is_nan() || self.y.to_f64().unwrap_or(f64::NAN).is_nan()
    }

    /// Returns the dot product of the two vectors.
    pub fn dot(&self, other: Self) -> T {
        self.x * other.x + self.y * other.y
    }

    /// Returns the vector's squared length.
    pub fn len_sqr(&self) -> T {
        self.dot(*self)
    }
}

impl<T> Add for Vec2<T>
where
    T: ValueType,
{
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl<T> Sub for Vec2<T>
where
    T: ValueType,
{
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl<T> Mul<T> for Vec2<T>
where
    T: ValueType,
{
    type Output = Self;

    fn mul(self, s: T) -> Self {
        Self {
            x: self.x * s,
            y: self.y * s,
        }
    }
}

impl<T> Vec3<T>
where
    T: ValueType,
{
    pub fn new(x: T, y: T, z: T) -> Self {
        let v = Self { x, y, z };
        debug_assert!(!v.has_nans());
        v
    }

    pub fn zeros() -> Self {
        Self {
            x: T::zero(),
            y: T::zero(),
            z: T::zero(),
        }
    }

    pub fn ones() -> Self {
        Self {
            x: T::one(),
            y: T::one(),
            z: T::one(),
        }
    }

    /// Returns `true` if any component is NaN.
    pub fn has_nans(&self) -> bool {
        // Cast to f64 since it is currently the largest floating point type
        self.x.to_f64().unwrap_or(f64::NAN).is_nan()
            || self.y.to_f64().unwrap_or(f64::NAN).is_nan()
            || self.z.to_f64().unwrap_or(f64::NAN).is_nan()
    }

    /// Returns the dot product of the two vectors.
    pub fn dot(&self, other: Self) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Returns the cross product of the two vectors.
    pub fn cross(&self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Returns the vector's squared length.
    pub fn len_sqr(&self) -> T {
        self.dot(*self)
    }

    /// Returns the component-wise minimum of the two vectors.
    pub fn min(&self, other: Self) -> Self {
        Self {
            x: self.x.mini(other.x),
            y: self.y.mini(other.y),
            z: self.z.mini(other.z),
        }
    }

    /// Returns the component-wise maximum of the two vectors.
    pub fn max(&self, other: Self) -> Self {
        Self {
            x: self.x.maxi(other.x),
            y: self.y.maxi(other.y),
            z: self.z.maxi(other.z),
        }
    }

    /// Returns the value of the maximum component.
    pub fn max_comp(&self) -> T {
        self.x.maxi(self.y).maxi(self.z)
    }
}

impl<T> Vec3<T>
where
    T: FloatValueType,
{
    /// Returns the vector's length.
    pub fn len(&self) -> T {
        self.len_sqr().sqrt()
    }

    /// Returns the normalized vector.
    pub fn normalized(&self) -> Self {
        *self / self.len()
    }

    /// Returns the component-wise absolute value of the vector.
    pub fn abs(&self) -> Self {
        Self {
            x: self.x.abs(),
            y: self.y.abs(),
            z: self.z.abs(),
        }
    }

    /// Returns two vectors that form an orthonormal basis with this (unit) vector.
    pub fn orthonormal_basis(&self) -> (Self, Self) {
        let tangent = if self.x.abs() > self.y.abs() {
            let inv_len = T::one() / (self.x * self.x + self.z * self.z).sqrt();
            Self::new(-self.z * inv_len, T::zero(), self.x * inv_len)
        } else {
            let inv_len = T::one() / (self.y * self.y + self.z * self.z).sqrt();
            Self::new(T::zero(), self.z * inv_len, -self.y * inv_len)
        };
        (tangent, self.cross(tangent))
    }
}

impl<T> Index<usize> for Vec3<T>
where
    T: ValueType,
{
    type Output = T;

    fn index(&self, i: usize) -> &T {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Out of bounds Vec3 index {}", i),
        }
    }
}

impl<T> Neg for Vec3<T>
where
    T: ValueType + Neg<Output = T>,
{
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl<T> Add for Vec3<T>
where
    T: ValueType,
{
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl<T> AddAssign for Vec3<T>
where
    T: ValueType,
{
    fn add_assign(&mut self, other: Self) {
        self.x = self.x + other.x;
        self.y = self.y + other.y;
        self.z = self.z + other.z;
    }
}

impl<T> Sub for Vec3<T>
where
    T: ValueType,
{
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl<T> SubAssign for Vec3<T>
where
    T: ValueType,
{
    fn sub_assign(&mut self, other: Self) {
        self.x = self.x - other.x;
        self.y = self.y - other.y;
        self.z = self.z - other.z;
    }
}

impl<T> Mul<T> for Vec3<T>
where
    T: ValueType,
{
    type Output = Self;

    fn mul(self, s: T) -> Self {
        Self {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }
}

impl<T> MulAssign<T> for Vec3<T>
where
    T: ValueType,
{
    fn mul_assign(&mut self, s: T) {
        self.x = self.x * s;
        self.y = self.y * s;
        self.z = self.z * s;
    }
}

// Component-wise products come up all over in throughput and color math
impl<T> Mul for Vec3<T>
where
    T: ValueType,
{
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        Self {
            x: self.x * other.x,
            y: self.y * other.y,
            z: self.z * other.z,
        }
    }
}

impl<T> MulAssign for Vec3<T>
where
    T: ValueType,
{
    fn mul_assign(&mut self, other: Self) {
        self.x = self.x * other.x;
        self.y = self.y * other.y;
        self.z = self.z * other.z;
    }
}

impl<T> Div<T> for Vec3<T>
where
    T: ValueType,
{
    type Output = Self;

    fn div(self, s: T) -> Self {
        Self {
            x: self.x / s,
            y: self.y / s,
            z: self.z / s,
        }
    }
}
