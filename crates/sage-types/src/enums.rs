use sage_wire::ByteCursor;

use crate::error::TypeError;
use crate::record::WireField;

/// A closed enumeration stored on the wire as a fixed-width integer.
///
/// `VALUES` is the registered set of legal raw values. Decoding checks the
/// raw integer against it and fails on anything else, so downstream code
/// never dispatches on a variant that the file didn't actually contain.
pub trait WireEnum: Sized + Copy + 'static {
  /// Type name used in diagnostics.
  const NAME: &'static str;

  /// Raw integer representation on the wire.
  type Repr: WireField + Copy + PartialEq + Into<i64> + 'static;

  /// Every defined raw value, in declaration order.
  const VALUES: &'static [Self::Repr];

  /// Map a raw value to its variant, or `None` if it isn't defined.
  fn from_repr(raw: Self::Repr) -> Option<Self>;

  fn to_repr(self) -> Self::Repr;

  /// Whether `raw` belongs to the registered value set.
  fn is_defined(raw: Self::Repr) -> bool {
    Self::VALUES.contains(&raw)
  }
}

/// Read `E::Repr` and validate it against `E`'s value set.
///
/// The cursor is left untouched on failure, including when the integer
/// itself decoded fine but named no variant.
///
/// # Errors
///
/// - [`TypeError::Wire`] if the integer is truncated.
/// - [`TypeError::InvalidEnumValue`] naming `E` and the raw value.
pub fn read_enum<E: WireEnum>(cursor: &mut ByteCursor<'_>) -> Result<E, TypeError> {
  cursor.atomic(|c| {
    let offset = c.position();
    let raw = <E::Repr as WireField>::read_field(c)?;
    E::from_repr(raw).ok_or_else(|| {
      let value: i64 = raw.into();
      tracing::debug!(enum_name = E::NAME, value, offset, "rejected undefined enum value");
      TypeError::InvalidEnumValue {
        enum_name: E::NAME,
        value,
        offset,
      }
    })
  })
}

/// Enum reads as cursor methods, one per wire width.
///
/// The `Repr` bound ties each method to the width the enum is declared
/// with, so reading a `u32`-backed enum as a byte does not compile.
pub trait EnumReadExt {
  /// Read one byte as `E`.
  ///
  /// # Errors
  ///
  /// See [`read_enum`].
  fn read_u8_enum<E: WireEnum<Repr = u8>>(&mut self) -> Result<E, TypeError>;

  /// Read a little-endian `u16` as `E`.
  ///
  /// # Errors
  ///
  /// See [`read_enum`].
  fn read_u16_enum<E: WireEnum<Repr = u16>>(&mut self) -> Result<E, TypeError>;

  /// Read a little-endian `i32` as `E`.
  ///
  /// # Errors
  ///
  /// See [`read_enum`].
  fn read_i32_enum<E: WireEnum<Repr = i32>>(&mut self) -> Result<E, TypeError>;

  /// Read a little-endian `u32` as `E`.
  ///
  /// # Errors
  ///
  /// See [`read_enum`].
  fn read_u32_enum<E: WireEnum<Repr = u32>>(&mut self) -> Result<E, TypeError>;
}

impl EnumReadExt for ByteCursor<'_> {
  fn read_u8_enum<E: WireEnum<Repr = u8>>(&mut self) -> Result<E, TypeError> {
    read_enum(self)
  }

  fn read_u16_enum<E: WireEnum<Repr = u16>>(&mut self) -> Result<E, TypeError> {
    read_enum(self)
  }

  fn read_i32_enum<E: WireEnum<Repr = i32>>(&mut self) -> Result<E, TypeError> {
    read_enum(self)
  }

  fn read_u32_enum<E: WireEnum<Repr = u32>>(&mut self) -> Result<E, TypeError> {
    read_enum(self)
  }
}

// ── Macro for registered enums ────────────────────────────────────────
//
// Every enum read from an asset file is a fixed set of named variants,
// each mapped to one raw integer. The macro emits the enum, its
// `WireEnum` impl (with the value set as a const slice) and a `WireField`
// impl so the enum can sit directly in a `wire_record!` struct.

/// Declare an enum with explicit raw values and register them.
///
/// ```
/// sage_types::wire_enum! {
///   #[derive(Clone, Copy, Debug, PartialEq, Eq)]
///   pub enum Team: u8 {
///     Neutral = 0,
///     Player = 1,
///   }
/// }
///
/// use sage_types::{ByteCursor, EnumReadExt};
///
/// let mut cursor = ByteCursor::new(&[1, 2]);
/// assert_eq!(cursor.read_u8_enum::<Team>().unwrap(), Team::Player);
/// assert!(cursor.read_u8_enum::<Team>().is_err());
/// ```
#[macro_export]
macro_rules! wire_enum {
  (
    $(#[$meta:meta])*
    $vis:vis enum $name:ident : $repr:ty {
      $( $(#[$vmeta:meta])* $variant:ident = $wire:literal ),+ $(,)?
    }
  ) => {
    $(#[$meta])*
    $vis enum $name {
      $( $(#[$vmeta])* $variant ),+
    }

    impl $crate::enums::WireEnum for $name {
      const NAME: &'static str = stringify!($name);
      type Repr = $repr;
      const VALUES: &'static [$repr] = &[$( $wire ),+];

      fn from_repr(raw: $repr) -> ::std::option::Option<Self> {
        match raw {
          $( $wire => ::std::option::Option::Some(Self::$variant), )+
          _ => ::std::option::Option::None,
        }
      }

      fn to_repr(self) -> $repr {
        match self {
          $( Self::$variant => $wire ),+
        }
      }
    }

    impl $crate::record::WireField for $name {
      const WIDTH: usize = <$repr as $crate::record::WireField>::WIDTH;

      fn read_field(
        cursor: &mut $crate::ByteCursor<'_>,
      ) -> ::std::result::Result<Self, $crate::TypeError> {
        $crate::enums::read_enum(cursor)
      }
    }
  };
}

// ── CsfLanguage ───────────────────────────────────────────────────────

crate::wire_enum! {
  /// Language tag in a compiled string table (`.csf`) header.
  ///
  /// ```text
  /// ┌──────┬───────────┐
  /// │ Wire │ Language  │
  /// ├──────┼───────────┤
  /// │ 0    │ EnglishUs │
  /// │ 1    │ EnglishUk │
  /// │ 2    │ German    │
  /// │ 3    │ French    │
  /// │ 4    │ Spanish   │
  /// │ 5    │ Italian   │
  /// │ 6    │ Japanese  │
  /// │ 7    │ Jabber    │
  /// │ 8    │ Korean    │
  /// │ 9    │ Chinese   │
  /// └──────┴───────────┘
  /// ```
  #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
  pub enum CsfLanguage: u32 {
    EnglishUs = 0,
    EnglishUk = 1,
    German = 2,
    French = 3,
    Spanish = 4,
    Italian = 5,
    Japanese = 6,
    Jabber = 7,
    Korean = 8,
    Chinese = 9,
  }
}

// ── BitmapCompression ─────────────────────────────────────────────────

crate::wire_enum! {
  /// Pixel storage scheme in a bitmap info header.
  #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
  pub enum BitmapCompression: u32 {
    Rgb = 0,
    Rle8 = 1,
    Rle4 = 2,
    Bitfields = 3,
    Jpeg = 4,
    Png = 5,
  }
}
