/// Name of a registered shuffle (unique within a project's registry).
/// Example: `reachingJun17-trainset60shuffle5`
pub type ShuffleName = String;
/// Fraction of the dataset assigned to the training subset of a shuffle.
/// Examples: `0.6`, `0.95`
pub type TrainFraction = f64;
/// Position of one dataset row inside the project's labeled data.
/// Examples: `0`, `417`
pub type DataIndex = usize;
/// 1-based identifier assigned to interned split content on save.
/// Examples: `1`, `2`
pub type SplitId = usize;
/// Namespace prefix under which duplicated model folders may live.
/// Examples: `` (none), `augmentation-study`
pub type ModelPrefix = String;
