//! Diagnostic message catalogue.
//!
//! Every entry produces a code constant in `diagnostic_codes`, a template
//! constant in `diagnostic_messages` and a row in `DIAGNOSTIC_MESSAGES`.
//! Errors use the 1000 range, notes the 2000 range. Codes are never reused.

use super::{DiagnosticCategory, DiagnosticMessage};

macro_rules! define_diagnostics {
    ($($name:ident = $code:literal, $category:ident, $message:literal;)*) => {
        pub mod diagnostic_codes {
            $(pub const $name: u32 = $code;)*
        }

        pub mod diagnostic_messages {
            $(pub const $name: &str = $message;)*
        }

        pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
            $(DiagnosticMessage {
                code: $code,
                category: DiagnosticCategory::$category,
                message: $message,
            },)*
        ];
    };
}

define_diagnostics! {
    // -------------------------------------------------------------------------
    // Contextual conversions
    // -------------------------------------------------------------------------
    CANNOT_CONVERT_TO_SPECIFIED_TYPE = 1001, Error,
        "cannot convert value of type '{0}' to specified type '{1}'";
    CANNOT_CONVERT_ARGUMENT = 1002, Error,
        "cannot convert value of type '{0}' to expected argument type '{1}'";
    CANNOT_CONVERT_RETURN = 1003, Error,
        "cannot convert return expression of type '{0}' to return type '{1}'";
    CANNOT_ASSIGN_VALUE = 1004, Error,
        "cannot assign value of type '{0}' to type '{1}'";
    CANNOT_CONVERT_ELEMENT = 1005, Error,
        "cannot convert value of type '{0}' to expected element type '{1}'";
    THROWING_TO_NON_THROWING = 1006, Error,
        "invalid conversion from throwing function of type '{0}' to non-throwing function type '{1}'";
    MISSING_FORCED_DOWNCAST = 1007, Error,
        "'{0}' is not convertible to '{1}'; did you mean to use 'as!' to force downcast?";
    MISSING_ADDRESS_OF = 1008, Error,
        "passing value of type '{0}' to an inout parameter requires explicit '&'";
    EXTRANEOUS_ADDRESS_OF = 1009, Error,
        "use of extraneous '&'";
    CANNOT_CONVERT_VALUE = 1010, Error,
        "cannot convert value of type '{0}' to '{1}'";
    KEY_PATH_VALUE_MISMATCH = 1011, Error,
        "key path value type '{0}' cannot be converted to contextual type '{1}'";
    AUTOCLOSURE_POINTER_CONVERSION = 1012, Error,
        "cannot perform pointer conversion of value of type '{0}' to autoclosure result type '{1}'";
    TUPLE_TYPE_MISMATCH = 1013, Error,
        "tuple type '{0}' is not convertible to tuple type '{1}'";
    INOUT_TYPE_MISMATCH = 1014, Error,
        "inout argument could be set to a value with a type other than '{0}'; use a value declared as type '{1}' instead";
    ARRAY_INTO_VARARGS = 1015, Error,
        "cannot pass array of type '{0}' as variadic arguments of type '{1}'";

    // -------------------------------------------------------------------------
    // Optionals, l-values and escaping
    // -------------------------------------------------------------------------
    OPTIONAL_NOT_UNWRAPPED = 1016, Error,
        "value of optional type '{0}' must be unwrapped to a value of type '{1}'";
    OPTIONAL_BASE_NOT_UNWRAPPED = 1017, Error,
        "value of optional type '{0}' must be unwrapped to refer to member '{1}' of wrapped base type '{2}'";
    ASSIGN_TO_LET = 1018, Error,
        "cannot assign to value: '{0}' is a 'let' constant";
    ASSIGN_TO_IMMUTABLE = 1019, Error,
        "cannot assign to immutable expression of type '{0}'";
    PASSING_NON_ESCAPING_PARAM = 1020, Error,
        "passing non-escaping parameter '{0}' to function expecting an @escaping closure";
    CONVERTING_NON_ESCAPING = 1021, Error,
        "converting non-escaping value to '{0}' may allow it to escape";
    AUTOCLOSURE_FORWARDING = 1022, Error,
        "add () to forward @autoclosure parameter";
    FORCE_UNWRAP_NON_OPTIONAL = 1023, Error,
        "cannot force unwrap value of non-optional type '{0}'";
    OPTIONAL_CHAIN_NON_OPTIONAL = 1024, Error,
        "cannot use optional chaining on non-optional value of type '{0}'";
    FUNCTION_NOT_CALLED = 1025, Error,
        "function produces expected type '{0}'; did you mean to call it with '()'?";

    // -------------------------------------------------------------------------
    // Property wrappers and members
    // -------------------------------------------------------------------------
    USE_PROPERTY_WRAPPER = 1026, Error,
        "cannot use wrapped value '{0}' where its {1} of type '{2}' is expected; use '{3}' instead";
    USE_WRAPPED_VALUE = 1027, Error,
        "cannot use {0} '{1}' of type '{2}' where its wrapped value is expected; use '{3}' instead";
    USE_SUBSCRIPT_OPERATOR = 1028, Error,
        "value of type '{0}' has no property or method named 'subscript'; did you mean to use the subscript operator?";
    NO_MEMBER = 1029, Error,
        "value of type '{0}' has no member '{1}'";
    TYPE_HAS_NO_MEMBER = 1030, Error,
        "type '{0}' has no member '{1}'";
    MEMBER_ON_EXISTENTIAL = 1031, Error,
        "member '{0}' cannot be used on value of protocol type '{1}'; use a generic constraint instead";
    STATIC_MEMBER_ON_INSTANCE = 1032, Error,
        "static member '{0}' cannot be used on instance of type '{1}'";
    INSTANCE_MEMBER_ON_TYPE = 1033, Error,
        "instance member '{0}' cannot be used on type '{1}'";
    INACCESSIBLE_MEMBER = 1034, Error,
        "'{0}' is inaccessible due to '{1}' protection level";
    MUTATING_ON_RVALUE = 1035, Error,
        "cannot use mutating member on immutable value of type '{0}'";
    PARTIAL_APPLY_MUTATING = 1036, Error,
        "partial application of 'mutating' method is not allowed";
    DYNAMIC_CONSTRUCT_CLASS = 1037, Error,
        "constructing an object of class type '{0}' with a metatype value must use a 'required' initializer";
    CONSTRUCT_PROTOCOL_METATYPE = 1038, Error,
        "protocol type '{0}' cannot be instantiated";
    INIT_REF_ON_NON_CONST_METATYPE = 1039, Error,
        "initializing from a metatype value must reference 'init' explicitly";

    // -------------------------------------------------------------------------
    // Call arguments
    // -------------------------------------------------------------------------
    SINGLE_TUPLE_PARAM = 1040, Error,
        "'{0}' expects a single parameter of type '{1}'";
    CLOSURE_TUPLE_DESTRUCTURING = 1041, Error,
        "closure tuple parameter '{0}' does not support destructuring";
    MISSING_ARGUMENT_LABELS = 1042, Error,
        "missing argument labels '{0}' in call";
    EXTRANEOUS_ARGUMENT_LABELS = 1043, Error,
        "extraneous argument labels '{0}' in call";
    INCORRECT_ARGUMENT_LABELS = 1044, Error,
        "incorrect argument labels in call (have '{0}', expected '{1}')";
    MISSING_ARGUMENT = 1045, Error,
        "missing argument for parameter {0} in call";
    MISSING_ARGUMENTS = 1046, Error,
        "missing arguments for parameters {0} in call";
    ARGUMENT_OUT_OF_ORDER = 1047, Error,
        "{0} must precede {1}";

    // -------------------------------------------------------------------------
    // Generic requirements
    // -------------------------------------------------------------------------
    SAME_TYPE_REQUIREMENT = 1048, Error,
        "'{0}' requires the types '{1}' and '{2}' be equivalent";
    SUPERCLASS_REQUIREMENT = 1049, Error,
        "'{0}' requires that '{1}' inherit from '{2}'";
    CONFORMANCE_REQUIREMENT = 1050, Error,
        "'{0}' requires that '{1}' conform to '{2}'";
    CONTEXTUAL_CONFORMANCE = 1051, Error,
        "value of type '{0}' does not conform to specified type '{1}'";
    GENERIC_PARAMETER_NOT_INFERRED = 1052, Error,
        "generic parameter '{0}' could not be inferred";
    GENERIC_PARAMETERS_NOT_INFERRED = 1053, Error,
        "generic parameters {0} could not be inferred";
    FUNCTION_BUILDER_UNHANDLED = 1054, Error,
        "closure containing {0} cannot be used with function builder '{1}'";

    // -------------------------------------------------------------------------
    // Key paths and statements
    // -------------------------------------------------------------------------
    KEY_PATH_ANY_OBJECT_ROOT = 1055, Error,
        "the root type of a key path cannot be 'AnyObject'";
    KEY_PATH_SUBSCRIPT_NOT_HASHABLE = 1056, Error,
        "subscript index of type '{0}' in a key path must be Hashable";
    KEY_PATH_STATIC_MEMBER = 1057, Error,
        "key path cannot refer to static member '{0}'";
    KEY_PATH_MUTATING_GETTER = 1058, Error,
        "key path cannot refer to '{0}', which has a mutating getter";
    KEY_PATH_METHOD = 1059, Error,
        "key path cannot refer to instance method '{0}'";
    UNEXPECTED_RETURN_VALUE = 1060, Error,
        "unexpected non-void return value in void function";
    CONSTRUCT_PROTOCOL_VALUE = 1061, Error,
        "value of type '{0}' is a protocol; it cannot be instantiated";

    // -------------------------------------------------------------------------
    // Notes
    // -------------------------------------------------------------------------
    COALESCE_OPTIONAL = 2001, Message,
        "coalesce using '??' to provide a default when the optional value contains 'nil'";
    FORCE_UNWRAP_OPTIONAL = 2002, Message,
        "force-unwrap using '!' to abort execution if the optional value contains 'nil'";
    CHAIN_OPTIONAL = 2003, Message,
        "chain the optional using '?' to access member '{0}' only for non-'nil' base values";
    GENERIC_ARGUMENT_NOT_EQUAL = 2004, Message,
        "arguments to generic parameter '{0}' ('{1}' and '{2}') are expected to be equal";
    PARAMETER_NON_ESCAPING = 2005, Message,
        "parameter '{0}' is implicitly non-escaping";
    SPECIFY_GENERIC_ARGUMENTS = 2006, Message,
        "explicitly specify the generic arguments to fix this issue";
    PASS_TUPLE = 2007, Message,
        "did you mean to pass a tuple?";
    DECLARED_HERE = 2008, Message,
        "'{0}' declared here";
    CONSTRUCT_RAW_REPRESENTABLE = 2009, Message,
        "construct '{0}' from '{1}' value";
    USE_RAW_VALUE = 2010, Message,
        "use '.rawValue' of '{0}' to get a value of type '{1}'";
    CHANGE_LET_TO_VAR = 2011, Message,
        "change 'let' to 'var' to make it mutable";
}
