use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Email).unique_key())
                    .col(string_null(Users::Username).unique_key())
                    .col(string_null(Users::FullName))
                    .col(string(Users::UserType))
                    .col(string(Users::PasswordHash))
                    .col(boolean(Users::IsStaff).default(false))
                    .col(boolean(Users::IsSuperuser).default(false))
                    .col(boolean(Users::IsActive).default(true))
                    .col(integer_null(Users::SubmittedBy))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_submitted_by")
                            .from(Users::Table, Users::SubmittedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create departments table
        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(pk_auto(Departments::Id))
                    .col(string(Departments::DepartmentName))
                    .col(integer_null(Departments::SubmittedBy))
                    .col(timestamp(Departments::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_department_submitted_by")
                            .from(Departments::Table, Departments::SubmittedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create courses table
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(pk_auto(Courses::Id))
                    .col(string(Courses::CourseName))
                    .col(integer(Courses::DepartmentId))
                    .col(integer(Courses::Semester))
                    .col(string(Courses::ClassName))
                    .col(integer(Courses::LectureHours))
                    .col(integer_null(Courses::SubmittedBy))
                    .col(timestamp(Courses::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_department")
                            .from(Courses::Table, Courses::DepartmentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_submitted_by")
                            .from(Courses::Table, Courses::SubmittedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create students table
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(pk_auto(Students::Id))
                    .col(string(Students::FullName))
                    .col(integer(Students::DepartmentId))
                    .col(string(Students::ClassName))
                    .col(integer_null(Students::SubmittedBy))
                    .col(timestamp(Students::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_department")
                            .from(Students::Table, Students::DepartmentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_submitted_by")
                            .from(Students::Table, Students::SubmittedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create attendance table
        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(pk_auto(Attendance::Id))
                    .col(integer(Attendance::StudentId))
                    .col(integer(Attendance::CourseId))
                    .col(boolean(Attendance::Present).default(false))
                    .col(integer_null(Attendance::SubmittedBy))
                    .col(timestamp(Attendance::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendance_student")
                            .from(Attendance::Table, Attendance::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendance_course")
                            .from(Attendance::Table, Attendance::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendance_submitted_by")
                            .from(Attendance::Table, Attendance::SubmittedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(Attendance::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Departments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

// Define identifiers for all tables

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    Username,
    FullName,
    UserType,
    PasswordHash,
    IsStaff,
    IsSuperuser,
    IsActive,
    SubmittedBy,
}

#[derive(DeriveIden)]
enum Departments {
    Table,
    Id,
    DepartmentName,
    SubmittedBy,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Courses {
    Table,
    Id,
    CourseName,
    DepartmentId,
    Semester,
    ClassName,
    LectureHours,
    SubmittedBy,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Students {
    Table,
    Id,
    FullName,
    DepartmentId,
    SubmittedBy,
    ClassName,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Attendance {
    Table,
    Id,
    StudentId,
    CourseId,
    Present,
    SubmittedBy,
    UpdatedAt,
}
