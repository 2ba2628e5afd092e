pub(crate) mod avg;
pub(crate) mod block;
pub(crate) mod hadamard;
pub(crate) mod region;
pub(crate) mod satd;

#[cfg(test)]
pub(crate) mod test_util;
