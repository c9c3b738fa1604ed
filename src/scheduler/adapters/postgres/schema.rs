//! Diesel schema for task run state persistence.

diesel::table! {
    /// One run record per scheduled task.
    task_schedulers (identity) {
        /// Task identity hash.
        #[max_length = 255]
        identity -> Varchar,
        /// Task name.
        #[max_length = 255]
        name -> Varchar,
        /// Concrete task type that last wrote the row.
        #[max_length = 512]
        executed_object_class -> Nullable<Varchar>,
        /// Task status code.
        status_code -> Int2,
        /// Start time of the recorded run in unix seconds.
        execution_time -> Int8,
        /// Time of the last finish transition in unix seconds.
        finish_time -> Nullable<Int8>,
        /// Status message payload.
        message -> Nullable<Jsonb>,
    }
}
