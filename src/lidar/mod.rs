// private sub-module defined in other files
mod convert;
mod header;
mod las;
mod point_data;
mod vlr;

// exports identifiers from private sub-modules in the current module namespace
pub use self::convert::class_color;
pub use self::convert::convert;
pub use self::convert::convert_with;
pub use self::header::CoordinateReferenceSystem;
pub use self::header::GlobalEncodingField;
pub use self::header::GpsTimeType;
pub use self::header::LasHeader;
pub use self::las::LasDecoder;
pub use self::las::LasFile;
pub use self::point_data::convert_class_val_to_class_string;
pub use self::point_data::format_has_rgb;
pub use self::point_data::Classification;
pub use self::point_data::PointData;
pub use self::point_data::RgbData;
pub use self::point_data::WaveformPacket;
pub use self::point_data::POINT_RECORD_LENGTHS;
pub use self::vlr::ClassificationLookupEntry;
pub use self::vlr::ExtraBytesDescriptor;
pub use self::vlr::GeoKeyDirectory;
pub use self::vlr::GeoKeyEntry;
pub use self::vlr::Vlr;
pub use self::vlr::VlrContent;
pub use self::vlr::WaveformPacketDescriptor;
