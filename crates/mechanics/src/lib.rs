pub mod drive;
pub mod motor;
pub mod robot;
pub mod sensor;

pub use drive::DifferentialDrive;
pub use motor::{Motor, SpeedLimits, rpm_to_rad_per_sec};
pub use robot::{Robot, RobotConfig, SensorMount};
pub use sensor::{LineClassifier, LinePolarity, LineSensor, OffMap, ReadingMode, SensorOffset};
