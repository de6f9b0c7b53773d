//! This example opens portal doors without an AR session,
//! the hit test always finds a floor three units in front of the world origin.
//!
//! Press Space to open a door, Up/Down to walk through it.

use bevy::prelude::*;
use bevy_portal_doors::*;
use tracing::info;

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins,
            // Panics if a door part is missing, and detects walking through doors
            DoorsPlugin {
                threshold: Some(DoorThreshold::default()),
                ..DoorsPlugin::minimal()
            },
        ))
        .insert_resource(ArSession::new(|_point: Vec2, kind: HitResultKind| {
            match kind {
                HitResultKind::ExistingPlaneExtent => vec![HitResult::from_position_normal(
                    Vec3::new(0., 0., -3.),
                    Vec3::Y,
                )],
                _ => Vec::new(),
            }
        }))
        .add_systems(Startup, setup)
        .add_systems(Update, (spawn_door_on_space, walk, log_opened_doors))
        .run();
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let camera = commands
        .spawn((
            Camera3d::default(),
            Transform::from_xyz(0., 1.5, 2.).looking_to(Vec3::NEG_Z, Vec3::Y),
        ))
        .id();

    commands.spawn((
        PointLight::default(),
        Transform::from_xyz(4., 8., 4.),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(20., 20.))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.5, 0.3))),
    ));

    let door_mesh = meshes.add(Cuboid::new(1.2, 2.9, 0.1));
    let anchor_mesh = meshes.add(Sphere::new(0.1));
    let mut door_parts = |color: Color| DoorParts {
        door: commands
            .spawn((
                Mesh3d(door_mesh.clone()),
                MeshMaterial3d(materials.add(color)),
                Transform::default(),
            ))
            .id(),
        source_anchor: commands
            .spawn((
                Mesh3d(anchor_mesh.clone()),
                MeshMaterial3d(materials.add(color)),
                Transform::default(),
            ))
            .id(),
    };
    let virtual_door = door_parts(Color::srgb(0.6, 0.2, 0.8));
    let reality_door = door_parts(Color::srgb(0.9, 0.7, 0.2));

    commands.insert_resource(DoorController::new(DoorSet {
        camera,
        virtual_door,
        reality_door,
    }));
}

fn spawn_door_on_space(keys: Res<ButtonInput<KeyCode>>, mut requests: MessageWriter<OpenDoorRequest>) {
    if keys.just_pressed(KeyCode::Space) {
        requests.write(OpenDoorRequest);
    }
}

fn walk(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut cameras: Query<&mut Transform, With<Camera3d>>,
) {
    let mut direction = 0.;
    if keys.pressed(KeyCode::ArrowUp) {
        direction += 1.;
    }
    if keys.pressed(KeyCode::ArrowDown) {
        direction -= 1.;
    }
    for mut transform in cameras.iter_mut() {
        let forward = transform.forward();
        transform.translation += forward * direction * 2. * time.delta_secs();
    }
}

fn log_opened_doors(mut opened: MessageReader<DoorOpened>) {
    for door_opened in opened.read() {
        info!(
            "{:?} door opened at {}",
            door_opened.variant, door_opened.transform.translation
        );
    }
}
