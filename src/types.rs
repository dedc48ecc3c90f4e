//! Type definitions, flags and enums.
//!
//! Enums convert to their native value with `to_native()` and back with
//! `TryFrom<u32>`, which fails with [`Error::UnexpectedValue`] for values the
//! binding layer does not know.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use crate::error::{Error, Result};
use crate::ffi::WGPUEnum;

/// Macro to define a native enum with conversions in both directions.
macro_rules! native_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:expr ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )*
        }

        impl $name {
            /// Native value of this variant.
            pub fn to_native(self) -> WGPUEnum {
                match self {
                    $( $name::$variant => $value, )*
                }
            }
        }

        impl TryFrom<WGPUEnum> for $name {
            type Error = Error;

            fn try_from(value: WGPUEnum) -> Result<Self> {
                $( if value == $value { return Ok($name::$variant); } )*
                Err(Error::UnexpectedValue {
                    kind: stringify!($name),
                    value,
                })
            }
        }
    };
}

// ============================================================================
// Flags
// ============================================================================

bitflags! {
    /// How a buffer may be used.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BufferUsage: u64 {
        const MAP_READ = 1 << 0;
        const MAP_WRITE = 1 << 1;
        const COPY_SRC = 1 << 2;
        const COPY_DST = 1 << 3;
        const INDEX = 1 << 4;
        const VERTEX = 1 << 5;
        const UNIFORM = 1 << 6;
        const STORAGE = 1 << 7;
        const INDIRECT = 1 << 8;
        const QUERY_RESOLVE = 1 << 9;
    }
}

bitflags! {
    /// How a texture may be used.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TextureUsage: u64 {
        const COPY_SRC = 1 << 0;
        const COPY_DST = 1 << 1;
        const TEXTURE_BINDING = 1 << 2;
        const STORAGE_BINDING = 1 << 3;
        const RENDER_ATTACHMENT = 1 << 4;
    }
}

bitflags! {
    /// Shader stages a binding is visible to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ShaderStage: u64 {
        const VERTEX = 1 << 0;
        const FRAGMENT = 1 << 1;
        const COMPUTE = 1 << 2;
    }
}

bitflags! {
    /// Access requested when mapping a buffer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MapMode: u64 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
    }
}

bitflags! {
    /// Color channels a render target writes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColorWriteMask: u64 {
        const RED = 1 << 0;
        const GREEN = 1 << 1;
        const BLUE = 1 << 2;
        const ALPHA = 1 << 3;
        const ALL = Self::RED.bits() | Self::GREEN.bits() | Self::BLUE.bits() | Self::ALPHA.bits();
    }
}

impl Default for ColorWriteMask {
    fn default() -> Self {
        Self::ALL
    }
}

bitflags! {
    /// Backends an instance may enumerate. Empty means all.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InstanceBackend: u64 {
        const VULKAN = 1 << 0;
        const GL = 1 << 1;
        const METAL = 1 << 2;
        const DX12 = 1 << 3;
        const BROWSER_WEBGPU = 1 << 5;
        const PRIMARY = Self::VULKAN.bits() | Self::METAL.bits() | Self::DX12.bits() | Self::BROWSER_WEBGPU.bits();
        const SECONDARY = Self::GL.bits();
    }
}

bitflags! {
    /// Instance debugging flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InstanceFlag: u64 {
        const DEBUG = 1 << 0;
        const VALIDATION = 1 << 1;
        const DISCARD_HAL_LABELS = 1 << 2;
    }
}

// ============================================================================
// Adapter / device enums
// ============================================================================

native_enum! {
    /// Adapter power preference.
    #[derive(Default)]
    PowerPreference {
        #[default]
        Undefined = 0,
        LowPower = 1,
        HighPerformance = 2,
    }
}

native_enum! {
    /// Feature level requested from an adapter.
    #[derive(Default)]
    FeatureLevel {
        #[default]
        Undefined = 0,
        Compatibility = 1,
        Core = 2,
    }
}

native_enum! {
    /// Graphics backend of an adapter.
    #[derive(Default)]
    BackendType {
        #[default]
        Undefined = 0,
        Null = 1,
        WebGpu = 2,
        D3D11 = 3,
        D3D12 = 4,
        Metal = 5,
        Vulkan = 6,
        OpenGl = 7,
        OpenGles = 8,
    }
}

native_enum! {
    /// Physical kind of an adapter.
    AdapterType {
        DiscreteGpu = 1,
        IntegratedGpu = 2,
        Cpu = 3,
        Unknown = 4,
    }
}

native_enum! {
    /// DX12 shader compiler selection.
    #[derive(Default)]
    Dx12Compiler {
        #[default]
        Undefined = 0,
        Fxc = 1,
        Dxc = 2,
    }
}

native_enum! {
    /// Minimum GLES 3 minor version.
    #[derive(Default)]
    Gles3MinorVersion {
        #[default]
        Automatic = 0,
        Version0 = 1,
        Version1 = 2,
        Version2 = 3,
    }
}

native_enum! {
    /// Category of a device error.
    ErrorType {
        NoError = 1,
        Validation = 2,
        OutOfMemory = 3,
        Internal = 4,
        Unknown = 5,
    }
}

native_enum! {
    /// Which errors an error scope captures.
    ErrorFilter {
        Validation = 1,
        OutOfMemory = 2,
        Internal = 3,
    }
}

native_enum! {
    /// Why a device was lost.
    DeviceLostReason {
        Unknown = 1,
        Destroyed = 2,
        InstanceDropped = 3,
        FailedCreation = 4,
    }
}

native_enum! {
    /// Mapping state of a buffer.
    BufferMapState {
        Unmapped = 1,
        Pending = 2,
        Mapped = 3,
    }
}

/// Optional device capability.
///
/// Features the binding layer does not name are carried as
/// [`FeatureName::Native`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureName {
    DepthClipControl,
    Depth32FloatStencil8,
    TimestampQuery,
    TextureCompressionBc,
    TextureCompressionEtc2,
    TextureCompressionAstc,
    IndirectFirstInstance,
    ShaderF16,
    Rg11b10UfloatRenderable,
    Bgra8UnormStorage,
    Float32Filterable,
    /// Any other native feature value (including wgpu-native extensions).
    Native(u32),
}

impl FeatureName {
    /// Native value of this feature.
    pub fn to_native(self) -> WGPUEnum {
        match self {
            FeatureName::DepthClipControl => 0x01,
            FeatureName::Depth32FloatStencil8 => 0x02,
            FeatureName::TimestampQuery => 0x03,
            FeatureName::TextureCompressionBc => 0x04,
            FeatureName::TextureCompressionEtc2 => 0x06,
            FeatureName::TextureCompressionAstc => 0x07,
            FeatureName::IndirectFirstInstance => 0x09,
            FeatureName::ShaderF16 => 0x0A,
            FeatureName::Rg11b10UfloatRenderable => 0x0B,
            FeatureName::Bgra8UnormStorage => 0x0C,
            FeatureName::Float32Filterable => 0x0D,
            FeatureName::Native(value) => value,
        }
    }
}

impl From<WGPUEnum> for FeatureName {
    fn from(value: WGPUEnum) -> Self {
        match value {
            0x01 => FeatureName::DepthClipControl,
            0x02 => FeatureName::Depth32FloatStencil8,
            0x03 => FeatureName::TimestampQuery,
            0x04 => FeatureName::TextureCompressionBc,
            0x06 => FeatureName::TextureCompressionEtc2,
            0x07 => FeatureName::TextureCompressionAstc,
            0x09 => FeatureName::IndirectFirstInstance,
            0x0A => FeatureName::ShaderF16,
            0x0B => FeatureName::Rg11b10UfloatRenderable,
            0x0C => FeatureName::Bgra8UnormStorage,
            0x0D => FeatureName::Float32Filterable,
            other => FeatureName::Native(other),
        }
    }
}

// ============================================================================
// Texture / sampler enums
// ============================================================================

native_enum! {
    /// Texture dimensionality.
    #[derive(Default)]
    TextureDimension {
        Undefined = 0,
        D1 = 1,
        #[default]
        D2 = 2,
        D3 = 3,
    }
}

native_enum! {
    /// Dimensionality of a texture view.
    #[derive(Default)]
    TextureViewDimension {
        #[default]
        Undefined = 0,
        D1 = 1,
        D2 = 2,
        D2Array = 3,
        Cube = 4,
        CubeArray = 5,
        D3 = 6,
    }
}

native_enum! {
    /// Aspect of a texture a view covers.
    #[derive(Default)]
    TextureAspect {
        #[default]
        Undefined = 0,
        All = 1,
        StencilOnly = 2,
        DepthOnly = 3,
    }
}

native_enum! {
    /// Texel format.
    #[derive(Default)]
    TextureFormat {
        #[default]
        Undefined = 0x00,
        R8Unorm = 0x01,
        R8Snorm = 0x02,
        R8Uint = 0x03,
        R8Sint = 0x04,
        R16Uint = 0x05,
        R16Sint = 0x06,
        R16Float = 0x07,
        Rg8Unorm = 0x08,
        Rg8Snorm = 0x09,
        Rg8Uint = 0x0A,
        Rg8Sint = 0x0B,
        R32Float = 0x0C,
        R32Uint = 0x0D,
        R32Sint = 0x0E,
        Rg16Uint = 0x0F,
        Rg16Sint = 0x10,
        Rg16Float = 0x11,
        Rgba8Unorm = 0x12,
        Rgba8UnormSrgb = 0x13,
        Rgba8Snorm = 0x14,
        Rgba8Uint = 0x15,
        Rgba8Sint = 0x16,
        Bgra8Unorm = 0x17,
        Bgra8UnormSrgb = 0x18,
        Rgb10a2Uint = 0x19,
        Rgb10a2Unorm = 0x1A,
        Rg11b10Ufloat = 0x1B,
        Rgb9e5Ufloat = 0x1C,
        Rg32Float = 0x1D,
        Rg32Uint = 0x1E,
        Rg32Sint = 0x1F,
        Rgba16Uint = 0x20,
        Rgba16Sint = 0x21,
        Rgba16Float = 0x22,
        Rgba32Float = 0x23,
        Rgba32Uint = 0x24,
        Rgba32Sint = 0x25,
        Stencil8 = 0x26,
        Depth16Unorm = 0x27,
        Depth24Plus = 0x28,
        Depth24PlusStencil8 = 0x29,
        Depth32Float = 0x2A,
        Depth32FloatStencil8 = 0x2B,
    }
}

native_enum! {
    /// Sampler address mode.
    #[derive(Default)]
    AddressMode {
        Undefined = 0,
        #[default]
        ClampToEdge = 1,
        Repeat = 2,
        MirrorRepeat = 3,
    }
}

native_enum! {
    /// Texel filter.
    #[derive(Default)]
    FilterMode {
        Undefined = 0,
        #[default]
        Nearest = 1,
        Linear = 2,
    }
}

native_enum! {
    /// Filter between mip levels.
    #[derive(Default)]
    MipmapFilterMode {
        Undefined = 0,
        #[default]
        Nearest = 1,
        Linear = 2,
    }
}

native_enum! {
    /// Comparison function for depth samplers.
    #[derive(Default)]
    CompareFunction {
        #[default]
        Undefined = 0,
        Never = 1,
        Less = 2,
        Equal = 3,
        LessEqual = 4,
        Greater = 5,
        NotEqual = 6,
        GreaterEqual = 7,
        Always = 8,
    }
}

// ============================================================================
// Binding enums
// ============================================================================

native_enum! {
    /// Buffer binding kind. `BindingNotUsed` leaves the slot empty.
    #[derive(Default)]
    BufferBindingType {
        #[default]
        BindingNotUsed = 0,
        Undefined = 1,
        Uniform = 2,
        Storage = 3,
        ReadOnlyStorage = 4,
    }
}

native_enum! {
    /// Sampler binding kind.
    #[derive(Default)]
    SamplerBindingType {
        #[default]
        BindingNotUsed = 0,
        Undefined = 1,
        Filtering = 2,
        NonFiltering = 3,
        Comparison = 4,
    }
}

native_enum! {
    /// Sampled texture component type.
    #[derive(Default)]
    TextureSampleType {
        #[default]
        BindingNotUsed = 0,
        Undefined = 1,
        Float = 2,
        UnfilterableFloat = 3,
        Depth = 4,
        Sint = 5,
        Uint = 6,
    }
}

native_enum! {
    /// Storage texture access.
    #[derive(Default)]
    StorageTextureAccess {
        #[default]
        BindingNotUsed = 0,
        Undefined = 1,
        WriteOnly = 2,
        ReadOnly = 3,
        ReadWrite = 4,
    }
}

// ============================================================================
// Render enums
// ============================================================================

native_enum! {
    /// How vertices are assembled into primitives.
    #[derive(Default)]
    PrimitiveTopology {
        Undefined = 0,
        PointList = 1,
        LineList = 2,
        LineStrip = 3,
        #[default]
        TriangleList = 4,
        TriangleStrip = 5,
    }
}

native_enum! {
    /// Index element type.
    #[derive(Default)]
    IndexFormat {
        #[default]
        Undefined = 0,
        Uint16 = 1,
        Uint32 = 2,
    }
}

native_enum! {
    /// Winding order of front-facing triangles.
    #[derive(Default)]
    FrontFace {
        Undefined = 0,
        #[default]
        Ccw = 1,
        Cw = 2,
    }
}

native_enum! {
    /// Which triangle faces are culled.
    #[derive(Default)]
    CullMode {
        Undefined = 0,
        #[default]
        None = 1,
        Front = 2,
        Back = 3,
    }
}

native_enum! {
    /// How often a vertex buffer advances.
    #[derive(Default)]
    VertexStepMode {
        /// Leaves the buffer slot empty.
        VertexBufferNotUsed = 0,
        Undefined = 1,
        #[default]
        Vertex = 2,
        Instance = 3,
    }
}

native_enum! {
    /// Format of one vertex attribute.
    VertexFormat {
        Uint8x2 = 0x02,
        Uint8x4 = 0x03,
        Sint8x2 = 0x05,
        Sint8x4 = 0x06,
        Unorm8x2 = 0x08,
        Unorm8x4 = 0x09,
        Snorm8x2 = 0x0B,
        Snorm8x4 = 0x0C,
        Uint16x2 = 0x0E,
        Uint16x4 = 0x0F,
        Sint16x2 = 0x11,
        Sint16x4 = 0x12,
        Unorm16x2 = 0x14,
        Unorm16x4 = 0x15,
        Float16x2 = 0x1A,
        Float16x4 = 0x1B,
        Float32 = 0x1C,
        Float32x2 = 0x1D,
        Float32x3 = 0x1E,
        Float32x4 = 0x1F,
        Uint32 = 0x20,
        Uint32x2 = 0x21,
        Uint32x3 = 0x22,
        Uint32x4 = 0x23,
        Sint32 = 0x24,
        Sint32x2 = 0x25,
        Sint32x3 = 0x26,
        Sint32x4 = 0x27,
    }
}

impl VertexFormat {
    /// Size of one attribute of this format, in bytes.
    pub fn size(self) -> u64 {
        match self {
            VertexFormat::Uint8x2 | VertexFormat::Sint8x2 | VertexFormat::Unorm8x2 | VertexFormat::Snorm8x2 => 2,
            VertexFormat::Uint8x4
            | VertexFormat::Sint8x4
            | VertexFormat::Unorm8x4
            | VertexFormat::Snorm8x4
            | VertexFormat::Uint16x2
            | VertexFormat::Sint16x2
            | VertexFormat::Unorm16x2
            | VertexFormat::Float16x2
            | VertexFormat::Float32
            | VertexFormat::Uint32
            | VertexFormat::Sint32 => 4,
            VertexFormat::Uint16x4
            | VertexFormat::Sint16x4
            | VertexFormat::Unorm16x4
            | VertexFormat::Float16x4
            | VertexFormat::Float32x2
            | VertexFormat::Uint32x2
            | VertexFormat::Sint32x2 => 8,
            VertexFormat::Float32x3 | VertexFormat::Uint32x3 | VertexFormat::Sint32x3 => 12,
            VertexFormat::Float32x4 | VertexFormat::Uint32x4 | VertexFormat::Sint32x4 => 16,
        }
    }
}

native_enum! {
    /// Blend equation operand.
    #[derive(Default)]
    BlendFactor {
        Undefined = 0x00,
        Zero = 0x01,
        #[default]
        One = 0x02,
        Src = 0x03,
        OneMinusSrc = 0x04,
        SrcAlpha = 0x05,
        OneMinusSrcAlpha = 0x06,
        Dst = 0x07,
        OneMinusDst = 0x08,
        DstAlpha = 0x09,
        OneMinusDstAlpha = 0x0A,
        SrcAlphaSaturated = 0x0B,
        Constant = 0x0C,
        OneMinusConstant = 0x0D,
    }
}

native_enum! {
    /// Blend equation operator.
    #[derive(Default)]
    BlendOperation {
        Undefined = 0,
        #[default]
        Add = 1,
        Subtract = 2,
        ReverseSubtract = 3,
        Min = 4,
        Max = 5,
    }
}

native_enum! {
    /// Stencil buffer update on test outcome.
    #[derive(Default)]
    StencilOperation {
        Undefined = 0,
        #[default]
        Keep = 1,
        Zero = 2,
        Replace = 3,
        Invert = 4,
        IncrementClamp = 5,
        DecrementClamp = 6,
        IncrementWrap = 7,
        DecrementWrap = 8,
    }
}

native_enum! {
    /// What a render pass does with an attachment when it begins.
    #[derive(Default)]
    LoadOp {
        #[default]
        Undefined = 0,
        Load = 1,
        Clear = 2,
    }
}

native_enum! {
    /// What a render pass does with an attachment when it ends.
    #[derive(Default)]
    StoreOp {
        #[default]
        Undefined = 0,
        Store = 1,
        Discard = 2,
    }
}

native_enum! {
    /// Kind of query a query set holds.
    QueryType {
        Occlusion = 1,
        Timestamp = 2,
    }
}

// ============================================================================
// Value types
// ============================================================================

/// Width, height and depth (or array layers) of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent3d {
    /// Texels along x.
    pub width: u32,
    /// Texels along y.
    pub height: u32,
    /// Depth of a 3D texture, or layer count of a 2D array.
    pub depth_or_array_layers: u32,
}

impl Default for Extent3d {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            depth_or_array_layers: 1,
        }
    }
}

/// Texel offset of a copy into a texture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Origin3d {
    pub x: u32,
    pub y: u32,
    /// Depth slice or array layer.
    pub z: u32,
}

/// RGBA color with double components, as used for clear values and blend
/// constants.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
    /// Alpha.
    pub a: f64,
}

impl Color {
    /// All components zero.
    pub const TRANSPARENT: Self = Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };
    pub const BLACK: Self = Self { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
}

/// An error reported by a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuError {
    /// Error category.
    pub kind: ErrorType,
    /// Native message, or "message unavailable".
    pub message: String,
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} error: {}", self.kind, self.message)
    }
}

impl std::error::Error for GpuError {}

/// Handler for errors no error scope captured.
pub type ErrorHandler = Arc<dyn Fn(&GpuError) + Send + Sync>;

/// Why and how a device was lost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceLost {
    /// Loss reason.
    pub reason: DeviceLostReason,
    /// Native message, or "message unavailable".
    pub message: String,
}

/// Adapter identification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterInfo {
    /// Vendor name, possibly empty.
    pub vendor: String,
    /// Architecture name, possibly empty.
    pub architecture: String,
    /// Device name.
    pub device: String,
    /// Driver description.
    pub description: String,
    /// Backend the adapter runs on.
    pub backend_type: BackendType,
    /// `None` when the native value is not recognized.
    pub adapter_type: Option<AdapterType>,
    /// PCI vendor id, or 0.
    pub vendor_id: u32,
    /// PCI device id, or 0.
    pub device_id: u32,
}
