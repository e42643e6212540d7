mod bytesbits;
mod core;
mod display;
mod equality;
mod function;
mod numeric;
mod record;

pub use bytesbits::{BitsValue, ByteAlign, BytesValue};
pub use core::{ListValue, MapValue, Value};
pub use equality::type_name;
pub use function::{
    BoundMethodValue, BuiltinValue, ClassMethodValue, ComposedFunctionValue, FunctionValue,
    NativeFn, PartialApplicationValue, TypeObjectValue,
};
pub use numeric::{NumericRank, RationalValue};
pub use record::{ConstructorValue, DataInstanceValue, RecordValue};
