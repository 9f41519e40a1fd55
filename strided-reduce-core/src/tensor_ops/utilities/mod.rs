pub(crate) mod reduction_utils;
